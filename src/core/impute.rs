use crate::domain::model::{ColumnKind, ColumnSpec, Imputation, ImputeStrategy, Table};
use crate::utils::error::{CleanError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Substitutes for columns that have no observed value to derive a mean or
/// mode from. `None` leaves such cells missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImputeOptions {
    pub numeric_fallback: Option<f64>,
    pub text_fallback: Option<String>,
}

/// Read a cell of a numeric column. Numeric strings count as numbers.
pub fn numeric_cell(column: &str, row: usize, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    };

    parsed.ok_or_else(|| CleanError::ColumnType {
        column: column.to_string(),
        row,
        value: value.to_string(),
    })
}

/// Running mean, so values near `f64::MAX` do not overflow a plain sum.
/// `None` when the column has no observed values or the mean is not finite.
pub fn column_mean(table: &Table, column: &str) -> Result<Option<f64>> {
    let mut mean = 0.0;
    let mut count = 0usize;

    for (row, value) in table.column_values(column).enumerate() {
        if let Some(value) = value {
            let x = numeric_cell(column, row, value)?;
            count += 1;
            let n = count as f64;
            mean += x / n - mean / n;
        }
    }

    Ok((count > 0 && mean.is_finite()).then_some(mean))
}

/// 出現次數最多的值；同票時取最先出現者
pub fn column_mode(table: &Table, column: &str) -> Result<Option<String>> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for (row, value) in table.column_values(column).enumerate() {
        match value {
            None => continue,
            Some(Value::String(s)) => {
                let count = counts.entry(s.as_str()).or_insert(0);
                if *count == 0 {
                    order.push(s.as_str());
                }
                *count += 1;
            }
            Some(other) => {
                return Err(CleanError::ColumnType {
                    column: column.to_string(),
                    row,
                    value: other.to_string(),
                })
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for candidate in order {
        let count = counts[candidate];
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((candidate, count));
        }
    }

    Ok(best.map(|(value, _)| value.to_string()))
}

fn fill_value(
    table: &Table,
    column: &ColumnSpec,
    options: &ImputeOptions,
) -> Result<Option<(ImputeStrategy, Value)>> {
    let fill = match column.kind {
        ColumnKind::Integer | ColumnKind::Number => match column_mean(table, &column.name)? {
            Some(mean) => Some((ImputeStrategy::Mean, Value::from(mean))),
            None => options
                .numeric_fallback
                .filter(|v| v.is_finite())
                .map(|v| (ImputeStrategy::Fallback, Value::from(v))),
        },
        ColumnKind::Text => match column_mode(table, &column.name)? {
            Some(mode) => Some((ImputeStrategy::Mode, Value::String(mode))),
            None => options
                .text_fallback
                .clone()
                .map(|v| (ImputeStrategy::Fallback, Value::String(v))),
        },
    };
    Ok(fill)
}

/// Fill missing cells: numeric columns with the mean of the observed values,
/// text columns with their mode. Columns without gaps are left untouched.
pub fn impute(mut table: Table, options: &ImputeOptions) -> Result<(Table, Vec<Imputation>)> {
    let mut imputations = Vec::new();
    let columns = table.schema().columns().to_vec();

    for column in &columns {
        let missing = table.column_values(&column.name).filter(Option::is_none).count();
        if missing == 0 {
            continue;
        }

        let Some((strategy, value)) = fill_value(&table, column, options)? else {
            tracing::warn!(
                "Column '{}' has no observed values; {} cells stay missing",
                column.name,
                missing
            );
            continue;
        };

        for record in table.rows_mut() {
            if record.is_missing(&column.name) {
                record.data.insert(column.name.clone(), value.clone());
            }
        }

        tracing::debug!(
            "Imputed {} missing '{}' values with {:?} {}",
            missing,
            column.name,
            strategy,
            value
        );
        imputations.push(Imputation {
            column: column.name.clone(),
            strategy,
            value,
            filled: missing,
        });
    }

    Ok((table, imputations))
}
