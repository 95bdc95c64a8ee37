// Output formatting for CLI

use crate::cli::config::OutputFormat;
use crate::cli::CliResult;
use std::io::{self, Write};

/// Format and output data
pub struct OutputFormatter {
    format: OutputFormat,
    pub quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output one record
    pub fn output_record(
        &self,
        record: &serde_json::Value,
        writer: &mut dyn Write,
    ) -> CliResult<()> {
        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(record)?)?;
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(record)?)?;
            }
            OutputFormat::KeyValue => {
                for (key, value) in flatten(record) {
                    writeln!(writer, "{}: {}", key, format_value(&value))?;
                }
            }
            OutputFormat::Table => {
                let items = flatten(record);
                let max_key_len = items.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

                writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
                for (key, value) in &items {
                    writeln!(
                        writer,
                        "{:<width$}: {}",
                        key,
                        format_value(value),
                        width = max_key_len
                    )?;
                }
                writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
            }
        }
        Ok(())
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

/// Flatten nested objects into dotted keys
fn flatten(value: &serde_json::Value) -> Vec<(String, serde_json::Value)> {
    let mut items = Vec::new();
    flatten_into(String::new(), value, &mut items);
    items
}

fn flatten_into(
    prefix: String,
    value: &serde_json::Value,
    items: &mut Vec<(String, serde_json::Value)>,
) {
    match value.as_object() {
        Some(obj) => {
            for (key, child) in obj {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(key, child, items);
            }
        }
        None => items.push((prefix, value.clone())),
    }
}

/// Format a JSON value for display
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "(null)".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Array(arr) => format!("[{} items]", arr.len()),
        serde_json::Value::Object(obj) => format!("{{{} items}}", obj.len()),
    }
}

/// Progress indicator for batch operations, written to stderr
pub struct ProgressBar {
    total: usize,
    current: usize,
    show: bool,
}

impl ProgressBar {
    pub fn new(total: usize, show: bool) -> Self {
        Self {
            total,
            current: 0,
            show,
        }
    }

    pub fn increment(&mut self, label: &str) {
        self.current += 1;
        if self.show && self.total > 0 {
            let percent = (self.current * 100) / self.total;
            let mut stderr = io::stderr();
            let _ = write!(stderr, "\r[{}/{}] ({}%) {}", self.current, self.total, percent, label);
            if self.current == self.total {
                let _ = writeln!(stderr);
            }
            let _ = stderr.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(format: OutputFormat, record: &serde_json::Value) -> String {
        let mut out = Vec::new();
        OutputFormatter::new(format, true)
            .output_record(record, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_key_value_flattens_tag() {
        let record = json!({"file": "a.mp3", "tag": {"title": "Words", "year": null}});
        assert_eq!(
            render(OutputFormat::KeyValue, &record),
            "file: a.mp3\ntag.title: Words\ntag.year: (null)\n"
        );
    }

    #[test]
    fn test_json_is_single_line() {
        let record = json!({"file": "a.mp3", "tag": null});
        assert_eq!(render(OutputFormat::Json, &record), "{\"file\":\"a.mp3\",\"tag\":null}\n");
    }
}
