// dvt-core/src/infrastructure/result_handler.rs

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use crate::domain::validation::{OutputFormat, ResultHandlerConfig};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::engine::ValidationOutcome;

const COLUMNS: [&str; 6] = ["validation", "type", "side", "connection", "fields", "sql"];

/// Renders outcomes in the format named by a `Text` result handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextResultHandler {
    format: OutputFormat,
}

impl TextResultHandler {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn from_config(config: Option<&ResultHandlerConfig>) -> Self {
        match config {
            Some(ResultHandlerConfig::Text { format }) => Self::new(*format),
            None => Self::default(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render(&self, outcome: &ValidationOutcome) -> Result<String, InfrastructureError> {
        let rendered = match self.format {
            OutputFormat::Text => render_text(outcome),
            OutputFormat::Csv => render_csv(outcome),
            OutputFormat::Json => serde_json::to_string_pretty(outcome)
                .map_err(|e| InfrastructureError::json("validation outcome", e))?,
            OutputFormat::Table => render_table(outcome),
        };
        Ok(rendered)
    }
}

fn render_text(outcome: &ValidationOutcome) -> String {
    let mut out = format!("[{}] {}\n", outcome.validation_type, outcome.validation_name);
    for query in &outcome.queries {
        out.push_str(&format!(
            "  {} ({}): {}\n    {}\n",
            query.side,
            query.connection,
            query.fields.join(", "),
            query.sql
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_csv(outcome: &ValidationOutcome) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    for query in &outcome.queries {
        let fields = query.fields.join(";");
        let row = [
            outcome.validation_name.as_str(),
            outcome.validation_type.as_str(),
            query.side.as_str(),
            query.connection.as_str(),
            fields.as_str(),
            query.sql.as_str(),
        ];
        out.push_str(&row.map(csv_field).join(","));
        out.push('\n');
    }
    out
}

fn render_table(outcome: &ValidationOutcome) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(COLUMNS.to_vec());

    for query in &outcome.queries {
        table.add_row(vec![
            outcome.validation_name.clone(),
            outcome.validation_type.clone(),
            query.side.clone(),
            query.connection.clone(),
            query.fields.join("\n"),
            query.sql.clone(),
        ]);
    }
    format!("{}\n", table)
}
