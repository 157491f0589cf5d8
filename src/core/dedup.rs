use crate::domain::model::{ColumnKind, Record, Schema, Table};
use serde_json::Value;
use std::collections::HashSet;

/// 比對用的儲存格鍵值：數值欄位以數值比較，所以 25 與 25.0 視為相同
#[derive(Debug, Hash, PartialEq, Eq)]
enum CellKey {
    Missing,
    Int(i64),
    UInt(u64),
    Float(u64),
    Text(String),
    Other(String),
}

/// 整數化為精確鍵值，只有真正的小數才用 f64 位元
fn float_key(n: f64) -> CellKey {
    if n.fract() == 0.0 {
        if n >= i64::MIN as f64 && n < i64::MAX as f64 {
            return CellKey::Int(n as i64);
        }
        if n >= 0.0 && n < u64::MAX as f64 {
            return CellKey::UInt(n as u64);
        }
    }
    // -0.0 == 0.0 已在上面以整數處理
    CellKey::Float(n.to_bits())
}

/// 整數保持精確，超過 2^53 的相鄰整數不會被合併
fn numeric_key(value: &Value) -> Option<CellKey> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(CellKey::Int(i))
            } else if let Some(u) = n.as_u64() {
                Some(CellKey::UInt(u))
            } else {
                n.as_f64().map(float_key)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(CellKey::Int(i))
            } else if let Ok(u) = s.parse::<u64>() {
                Some(CellKey::UInt(u))
            } else {
                s.parse::<f64>().ok().map(float_key)
            }
        }
        _ => None,
    }
}

fn cell_key(kind: ColumnKind, value: Option<&Value>) -> CellKey {
    let Some(value) = value else {
        return CellKey::Missing;
    };

    if kind.is_numeric() {
        if let Some(key) = numeric_key(value) {
            return key;
        }
    }

    match value {
        Value::String(s) => CellKey::Text(s.clone()),
        other => CellKey::Other(other.to_string()),
    }
}

fn row_key(schema: &Schema, record: &Record) -> Vec<CellKey> {
    schema
        .columns()
        .iter()
        .map(|c| cell_key(c.kind, record.get(&c.name)))
        .collect()
}

/// Drop rows equal to an earlier row on every schema column. Keeps the
/// first occurrence and the relative order of the survivors.
pub fn deduplicate(table: Table) -> (Table, usize) {
    let schema = table.schema().clone();
    let before = table.len();

    let mut seen = HashSet::with_capacity(before);
    let rows: Vec<Record> = table
        .into_rows()
        .into_iter()
        .filter(|record| seen.insert(row_key(&schema, record)))
        .collect();

    let removed = before - rows.len();
    if removed > 0 {
        tracing::debug!("Removed {} duplicate rows", removed);
    }

    (Table::new(schema, rows), removed)
}
