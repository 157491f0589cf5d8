use crate::domain::model::{ColumnKind, Employee, Record, Schema, Table};
use crate::utils::error::{CleanError, Result};
use serde_json::{Map, Value};

/// Tokens read as a missing cell, matching common CSV exports.
const MISSING_TOKENS: [&str; 6] = ["", "NA", "N/A", "NaN", "null", "None"];

fn parse_cell(kind: Option<ColumnKind>, raw: &str) -> Value {
    let numeric = kind.is_some_and(|k| k.is_numeric());

    // 文字欄位不修剪空白，"   " 要交給 name 規則判定
    let token = if numeric { raw.trim() } else { raw };
    if MISSING_TOKENS.contains(&token) {
        return Value::Null;
    }

    if numeric {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::from(n);
        }
        if let Some(n) = trimmed.parse::<f64>().ok().filter(|n| n.is_finite()) {
            return Value::from(n);
        }
    }

    // 無法解析的數值保留原字串，由清理流程判定
    Value::String(raw.to_string())
}

pub fn read_csv(schema: Schema, data: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let kinds: Vec<Option<ColumnKind>> = headers
        .iter()
        .map(|h| schema.column(h).map(|c| c.kind))
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        let mut record = Record::new();
        for ((header, kind), raw) in headers.iter().zip(&kinds).zip(row.iter()) {
            record.data.insert(header.to_string(), parse_cell(*kind, raw));
        }
        rows.push(record);
    }

    tracing::debug!("Parsed {} CSV rows with columns {:?}", rows.len(), headers);
    Ok(Table::new(schema, rows))
}

pub fn read_json(schema: Schema, data: &[u8]) -> Result<Table> {
    let objects: Vec<Map<String, Value>> = serde_json::from_slice(data)?;
    let rows = objects
        .into_iter()
        .map(|obj| Record {
            data: obj.into_iter().collect(),
        })
        .collect::<Vec<_>>();

    tracing::debug!("Parsed {} JSON rows", rows.len());
    Ok(Table::new(schema, rows))
}

/// Pick the reader from the file extension.
pub fn read_table(path: &str, schema: Schema, data: &[u8]) -> Result<Table> {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => read_csv(schema, data),
        Some("json") => read_json(schema, data),
        _ => Err(CleanError::InvalidConfigValueError {
            field: "input".to_string(),
            value: path.to_string(),
            reason: "Input must be a .csv or .json file".to_string(),
        }),
    }
}

/// Delimited text with a header row, written even when there are no rows.
pub fn write_delimited(employees: &[Employee], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(Schema::employees().names())?;
    for employee in employees {
        writer.serialize(employee)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CleanError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CleanError::processing(e.to_string()))
}
