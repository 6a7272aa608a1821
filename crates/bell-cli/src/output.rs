use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => render_text(value),
        OutputFormat::Raw => render_raw(value),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// One JSON document per line; arrays become one line per element.
fn render_raw<T: Serialize>(value: &T) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => {
            let lines = items
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(lines.join("\n"))
        }
        other => Ok(serde_json::to_string(&other)?),
    }
}

fn render_text<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let text = match serde_json::to_value(value)? {
        Value::Array(items) if items.is_empty() => String::from("(no rows)"),
        Value::Array(items) => items.iter().map(row_line).collect::<Vec<_>>().join("\n"),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{key}: {}", value_to_cell(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        scalar => value_to_cell(&scalar),
    };
    Ok(text)
}

fn row_line(item: &Value) -> String {
    match item.as_object() {
        Some(map) => map
            .values()
            .map(value_to_cell)
            .filter(|cell| !cell.is_empty())
            .collect::<Vec<_>>()
            .join("  "),
        None => value_to_cell(item),
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(value_to_cell).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        start: &'static str,
        period: Option<&'static str>,
        activities: Vec<&'static str>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                start: "09:00",
                period: Some("Green"),
                activities: vec!["Math", "Art"],
            },
            Row {
                start: "10:00",
                period: None,
                activities: vec![],
            },
        ]
    }

    #[test]
    fn text_rows_skip_empty_cells() {
        let text = render(&rows(), OutputFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for cell in ["09:00", "Green", "Math, Art"] {
            assert!(lines[0].contains(cell), "missing {cell} in {}", lines[0]);
        }
        assert_eq!(lines[1], "10:00");
    }

    #[test]
    fn raw_emits_one_line_per_row() {
        let raw = render(&rows(), OutputFormat::Raw).unwrap();
        let lines: Vec<serde_json::Value> = raw.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["period"], "Green");
        assert_eq!(lines[1]["period"], serde_json::Value::Null);
    }

    #[test]
    fn empty_list_in_text_mode() {
        let empty: Vec<Row> = Vec::new();
        assert_eq!(render(&empty, OutputFormat::Text).unwrap(), "(no rows)");
    }
}
