use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the xlt binary.
#[derive(Parser, Debug)]
#[command(
    name = "xlt",
    version,
    about = "Type-descriptor normalization for the xlt transpiler backend"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Output format for reports.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Number of models processed in parallel (defaults to the CPU count).
    #[arg(short = 'j', long, global = true)]
    pub jobs: Option<usize>,

    /// Disable colored text output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe every named type of one or more program models.
    Describe {
        /// JSON program models; each is an independent compilation unit.
        #[arg(required = true)]
        models: Vec<PathBuf>,
    },

    /// Resolve the supertype qualifying a super call.
    SuperCall {
        /// JSON program model.
        model: PathBuf,

        /// Qualified name of the class containing the super call.
        #[arg(long = "class")]
        class: String,

        /// Targeted method as `Declaration.method`.
        #[arg(long)]
        method: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
