use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value, None),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Like [`render`], but a table shows only `columns`, in that order.
pub fn render_columns<T: Serialize>(
    value: &T,
    columns: &[&str],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => render_table(value, Some(columns)),
        other => render(value, other),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Print with a fixed column set for tables.
pub fn output_columns<T: Serialize>(
    value: &T,
    columns: &[&str],
    format: OutputFormat,
) -> anyhow::Result<()> {
    println!("{}", render_columns(value, columns, format)?);
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T, columns: Option<&[&str]>) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_rows(&items, columns)),
        Value::Object(map) => {
            let rows = map
                .into_iter()
                .filter(|(key, _)| columns.is_none_or(|cols| cols.contains(&key.as_str())))
                .map(|(key, value)| vec![key, cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_table(&["key", "value"], &rows, table_options()))
        }
        scalar => Ok(table::render_table(
            &["value"],
            &[vec![cell(&scalar)]],
            table_options(),
        )),
    }
}

fn render_rows(items: &[Value], columns: Option<&[&str]>) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    let headers: Vec<String> = match columns {
        Some(cols) => cols.iter().map(ToString::to_string).collect(),
        None => {
            let mut keys = Vec::<String>::new();
            for key in items.iter().filter_map(Value::as_object).flat_map(|m| m.keys()) {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            keys
        }
    };
    if headers.is_empty() {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, table_options());
    }

    let rows = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|header| item.get(header).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render_table(&header_refs, &rows, table_options())
}

/// One table cell. String lists are joined; other nested values stay JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;

    use super::{render, render_columns};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        sent: u32,
        chats: Vec<&'static str>,
    }

    fn example() -> Example {
        Example {
            id: "task_1",
            sent: 7,
            chats: vec!["-100", "@news"],
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&example(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "task_1");
        assert_eq!(parsed["sent"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&example(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn object_table_is_key_value() {
        let out = render(&example(), OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("-100, @news"));
    }

    #[test]
    fn column_selection_orders_and_filters() {
        let rows = vec![example()];
        let out = render_columns(&rows, &["sent", "id"], OutputFormat::Table)
            .expect("table render should work");
        let header = out.lines().next().expect("header");
        assert!(header.starts_with("sent"));
        assert!(header.contains("id"));
        assert!(!out.contains("@news"));
    }

    #[test]
    fn empty_array_has_placeholder() {
        let out = render(&json!([]), OutputFormat::Table).expect("table render should work");
        assert_eq!(out, "(no rows)");
    }
}
