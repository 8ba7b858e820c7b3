use clap::ValueEnum;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

#[derive(Clone, Copy)]
enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn message(&self, level: Level, msg: &str) {
        // errors are shown even in quiet mode
        if self.quiet && !matches!(level, Level::Error) {
            return;
        }

        if !self.is_human() {
            self.print_json(&json!({ "type": level.as_str(), "message": msg }));
            return;
        }

        match level {
            Level::Success => println!("{} {}", "✓".green(), msg),
            Level::Info => println!("{}", msg),
            Level::Warning => println!("{} {}", "⚠".yellow(), msg),
            Level::Error => eprintln!("{} {}", "✗".red(), msg),
        }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message(Level::Success, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message(Level::Info, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message(Level::Warning, msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.message(Level::Error, msg.as_ref());
    }

    /// Emit structured data; only used by non-human formats
    pub fn data<T: Serialize>(&self, data: &T) {
        if self.quiet {
            return;
        }
        match serde_json::to_value(data) {
            Ok(value) => self.print_json(&value),
            Err(e) => self.error(format!("Failed to serialise output: {}", e)),
        }
    }

    /// Print a table in human mode, `data` otherwise
    pub fn table<T: Serialize>(&self, title: &str, header: &[&str], rows: Vec<Vec<String>>, data: &T) {
        if self.quiet {
            return;
        }
        if !self.is_human() {
            self.data(data);
            return;
        }

        if rows.is_empty() {
            println!("{}", format!("{}: nothing stored", title).bright_black());
            return;
        }

        println!("{}", title.bright_cyan().bold());
        println!("{}", render_table(header, rows));
    }

    fn print_json(&self, data: &Value) {
        let rendered = match self.format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(data),
            _ => serde_json::to_string(data),
        };
        println!("{}", rendered.unwrap_or_default());
    }
}

pub fn render_table(header: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    for row in rows {
        table.add_row(row);
    }
    table
}

/// `-` for missing optional values in tables
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(3)), "3");
        assert_eq!(or_dash::<u32>(None), "-");
    }

    #[test]
    fn test_render_table_has_rows() {
        let table = render_table(&["Id", "Title"], vec![vec!["movie-1".into(), "Heat".into()]]);
        let rendered = table.to_string();
        assert!(rendered.contains("movie-1"));
        assert!(rendered.contains("Heat"));
    }
}
