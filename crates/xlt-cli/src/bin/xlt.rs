use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use xlt_cli::args::{CliArgs, Command, OutputFormat};
use xlt_cli::driver;
use xlt_cli::report::{Reporter, UnitReport};

const EXIT_SUCCESS: i32 = 0;
const EXIT_UNIT_FAILED: i32 = 1;

fn main() -> Result<()> {
    // Zero cost unless XLT_LOG or RUST_LOG is set.
    xlt_common::tracing_config::init_tracing();

    let args = CliArgs::parse();
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure the worker pool")?;
    }

    let units: Vec<UnitReport> = match &args.command {
        Command::Describe { models } => driver::run_describe(models),
        Command::SuperCall {
            model,
            class,
            method,
        } => vec![driver::run_super_call(model, class, method)],
    };

    match args.format {
        OutputFormat::Json => {
            let json = Reporter::new(false)
                .render_json(&units)
                .context("failed to serialize report")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            let color = !args.no_color && std::io::stdout().is_terminal();
            print!("{}", Reporter::new(color).render_text(&units));
        }
    }

    if units.iter().any(UnitReport::is_failure) {
        std::process::exit(EXIT_UNIT_FAILED);
    }
    std::process::exit(EXIT_SUCCESS);
}
