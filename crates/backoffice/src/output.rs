//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables are built
//! column-by-column from the entity schema with `tabled`, structured
//! formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use backoffice_core::{EntitySchema, QueryView, Record};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Green when color is on, untouched otherwise.
pub fn success(text: &str, color: bool) -> String {
    if color {
        text.green().to_string()
    } else {
        text.to_owned()
    }
}

pub fn dimmed(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render one page of records.
///
/// `table` shows the id plus every schema column with a page footer;
/// structured formats serialize the records themselves.
pub fn render_page(
    format: OutputFormat,
    schema: &EntitySchema,
    view: &QueryView,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            if view.is_empty() {
                return Ok(dimmed(&format!("No {} found", schema.resource), color));
            }
            let table = records_table(schema, &view.items);
            let footer = format!(
                "page {} of {} ({} {})",
                view.page,
                view.page_count(),
                view.total,
                schema.resource
            );
            Ok(format!("{table}\n{}", dimmed(&footer, color)))
        }
        OutputFormat::Json => render_json(&view.items, false),
        OutputFormat::JsonCompact => render_json(&view.items, true),
        OutputFormat::Yaml => render_yaml(&view.items),
        OutputFormat::Plain => Ok(view.items.iter().map(|r| record_id(r)).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single record. The table form is a field/value listing.
pub fn render_record(
    format: OutputFormat,
    schema: &EntitySchema,
    record: &Record,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(record_detail(schema, record)),
        OutputFormat::Json => render_json(record, false),
        OutputFormat::JsonCompact => render_json(record, true),
        OutputFormat::Yaml => render_yaml(record),
        OutputFormat::Plain => Ok(record_id(record)),
    }
}

/// Render any serializable value; `detail_fn` supplies the table form
/// and `plain_fn` the plain one.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Tables ───────────────────────────────────────────────────────────

fn records_table(schema: &EntitySchema, items: &[Arc<Record>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("ID".to_owned()).chain(schema.fields.iter().map(|f| f.label.clone())),
    );
    for record in items {
        builder.push_record(
            std::iter::once(record_id(record))
                .chain(schema.fields.iter().map(|f| cell(record.get(&f.name)))),
        );
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Two-column field/value table. Fields outside the schema follow the
/// schema columns in the order the server sent them.
pub fn record_detail(schema: &EntitySchema, record: &Record) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID".to_owned(), record_id(record)]);
    for field in &schema.fields {
        builder.push_record([field.label.clone(), cell(record.get(&field.name))]);
    }
    for (name, value) in &record.fields {
        if schema.spec(name).is_none() {
            builder.push_record([name.clone(), cell(Some(value))]);
        }
    }
    builder.build().with(Style::rounded()).to_string()
}

/// `key: value` pairs as a borderless two-column table.
pub fn key_values<'a>(rows: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let mut builder = Builder::default();
    for (key, value) in rows {
        builder.push_record([key.to_owned(), value]);
    }
    builder.build().with(Style::blank()).to_string()
}

fn record_id(record: &Record) -> String {
    record.id.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Validation {
        field: "output".into(),
        reason: format!("cannot render YAML: {e}"),
    })
}
