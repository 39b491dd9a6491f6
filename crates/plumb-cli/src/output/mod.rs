use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

/// Render a serializable response in the requested format.
///
/// Text output flattens objects into `key: value` lines; nested objects are
/// indented, arrays become `- item` lists.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => {
            let value = serde_json::to_value(value)?;
            let mut out = String::new();
            render_text(&value, 0, &mut out);
            Ok(out.trim_end().to_string())
        }
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_text(value: &Value, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                if is_scalar(item) {
                    let _ = writeln!(out, "{indent}{key}: {}", scalar_to_cell(item));
                } else {
                    let _ = writeln!(out, "{indent}{key}:");
                    render_text(item, depth + 1, out);
                }
            }
        }
        Value::Array(items) if items.is_empty() => {
            let _ = writeln!(out, "{indent}(none)");
        }
        Value::Array(items) => {
            for item in items {
                if is_scalar(item) {
                    let _ = writeln!(out, "{indent}- {}", scalar_to_cell(item));
                } else {
                    let _ = writeln!(out, "{indent}-");
                    render_text(item, depth + 1, out);
                }
            }
        }
        scalar => {
            let _ = writeln!(out, "{indent}{}", scalar_to_cell(scalar));
        }
    }
}

const fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
