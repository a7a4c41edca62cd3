use colored::Colorize;
use serde::Serialize;

/// What `describe` reports for one named type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeReport {
    pub name: String,
    pub rendering: String,
    pub nullable: bool,
    pub denotable: bool,
    pub non_null: String,
    /// Type variables only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable_bounds: Option<bool>,
    /// Raw declared types only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_arguments: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuperCallReport {
    pub class: String,
    pub method: String,
    /// `None` when no direct supertype supplies the method.
    pub super_type: Option<String>,
}

/// Outcome of one compilation unit.
#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_call: Option<SuperCallReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UnitReport {
    pub fn failed(path: String, error: &anyhow::Error) -> Self {
        UnitReport {
            path,
            types: Vec::new(),
            super_call: None,
            error: Some(format!("{error:#}")),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render_json(&self, units: &[UnitReport]) -> serde_json::Result<String> {
        serde_json::to_string_pretty(units)
    }

    pub fn render_text(&self, units: &[UnitReport]) -> String {
        let mut out = String::new();
        for (index, unit) in units.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            self.format_unit(unit, &mut out);
        }
        out
    }

    fn format_unit(&self, unit: &UnitReport, out: &mut String) {
        out.push_str(&self.paint_path(&unit.path));
        out.push('\n');

        if let Some(error) = &unit.error {
            out.push_str("  ");
            out.push_str(&self.paint_error("error"));
            out.push_str(": ");
            out.push_str(error);
            out.push('\n');
            return;
        }

        for ty in &unit.types {
            self.format_type(ty, out);
        }
        if let Some(call) = &unit.super_call {
            out.push_str(&format!("  super call to {} in {}: ", call.method, call.class));
            match &call.super_type {
                Some(super_type) => out.push_str(&format!("super<{}>", self.paint_type(super_type))),
                None => out.push_str(&self.paint_dim("no direct supertype")),
            }
            out.push('\n');
        }
    }

    fn format_type(&self, ty: &TypeReport, out: &mut String) {
        out.push_str(&format!("  {} = {}\n", ty.name, self.paint_type(&ty.rendering)));

        let mut facts = vec![
            format!("nullable: {}", ty.nullable),
            format!("denotable: {}", ty.denotable),
        ];
        if let Some(recursive) = ty.recursive {
            facts.push(format!("recursive: {recursive}"));
        }
        if let Some(nullable_bounds) = ty.nullable_bounds {
            facts.push(format!("nullable bounds: {nullable_bounds}"));
        }
        out.push_str(&format!("    {}\n", self.paint_dim(&facts.join(", "))));
        out.push_str(&format!("    non-null: {}\n", self.paint_type(&ty.non_null)));
        if let Some(arguments) = &ty.projected_arguments {
            out.push_str(&format!(
                "    raw arguments: <{}>\n",
                self.paint_type(&arguments.join(", "))
            ));
        }
    }

    fn paint_path(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_type(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }
}
