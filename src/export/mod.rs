pub mod error;
pub mod reports;

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use error::*;


/// A flat report row. Column order is insertion order.
pub type Record = Map<String, Value>;

const BYTE_ORDER_MARK: &str = "\u{FEFF}";

lazy_static! {
    static ref PATH_UNSAFE: Regex = Regex::new("[:.]").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// CSV prefixed with a byte-order mark so spreadsheet tools pick up UTF-8
    Spreadsheet,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv | Self::Spreadsheet => "csv",
            Self::Json => "json",
        }
    }

    pub fn render(&self, records: &[Record]) -> Result<String> {
        match self {
            Self::Csv => encode_csv(records),
            Self::Spreadsheet => encode_spreadsheet_csv(records),
            Self::Json => encode_json(&records),
        }
    }
}

fn format_number(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

///
/// Encodes one cell. Nested values become quoted inline JSON, strings
/// holding a comma or quote are quoted with inner quotes doubled,
/// null is empty and everything else is its plain text form.
///
pub fn encode_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) if s.contains(',') || s.contains('"') => quote(s),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => quote(&value.to_string()),
    }
}

///
/// Headers come from the first record's keys. Every later record is read
/// against those headers; missing keys encode as empty cells.
///
pub fn encode_csv(records: &[Record]) -> Result<String> {
    let first = records.first().ok_or(Error::NoData)?;
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(headers.iter().map(|h| h.as_str()).collect::<Vec<_>>().join(","));
    for record in records {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| record.get(h.as_str()).map(encode_cell).unwrap_or_default())
            .collect();
        lines.push(cells.join(","));
    }

    Ok(lines.join("\n"))
}

pub fn encode_spreadsheet_csv(records: &[Record]) -> Result<String> {
    Ok(format!("{}{}", BYTE_ORDER_MARK, encode_csv(records)?))
}

pub fn encode_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

///
/// `<prefix>_<YYYY-MM-DDTHH-MM-SS>.<ext>`, sortable and free of path separators.
///
pub fn generate_filename(prefix: &str, extension: &str, now: DateTime<Utc>) -> String {
    let iso = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let stamp = PATH_UNSAFE.replace_all(&iso, "-");
    // Drop the milliseconds and zone suffix
    let stamp = &stamp[..stamp.len().saturating_sub(5)];
    format!("{}_{}.{}", prefix, stamp, extension)
}

pub fn write_report(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(filename);
    fs::create_dir_all(dir).map_err(|e| Error::WriteError(path.clone(), e))?;
    fs::write(&path, content).map_err(|e| Error::WriteError(path.clone(), e))?;
    info!("Wrote report {}", path.display());
    Ok(path)
}
