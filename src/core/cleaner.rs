use crate::core::dedup::deduplicate;
use crate::core::impute::{impute, numeric_cell, ImputeOptions};
use crate::core::rules::validate_record;
use crate::domain::model::{
    CleanOutcome, CleanReport, ColumnKind, Rejection, Schema, Table, ValidationResult,
};
use crate::utils::error::{CleanError, Result};
use chrono::Utc;
use serde_json::Value;

/// Deduplicate, impute, validate.
#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    options: ImputeOptions,
}

impl CleaningPipeline {
    pub fn new(options: ImputeOptions) -> Self {
        Self { options }
    }

    /// Cleaned table, or an empty one when the run hits an unexpected error.
    pub fn clean(&self, table: Table) -> Table {
        self.run(table).table
    }

    /// Like [`clean`](Self::clean) but keeps the report. Errors are logged
    /// and recorded in `report.aborted`, never returned.
    pub fn run(&self, table: Table) -> CleanOutcome {
        let started_at = Utc::now();
        let input_rows = table.len();

        match self.try_clean(table) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("❌ Cleaning aborted, no rows kept: {}", e);
                CleanOutcome {
                    table: Table::empty(Schema::employees()),
                    employees: Vec::new(),
                    report: CleanReport {
                        input_rows,
                        duplicates_removed: 0,
                        imputations: Vec::new(),
                        rejections: Vec::new(),
                        output_rows: 0,
                        aborted: Some(e.to_string()),
                        started_at,
                        finished_at: Utc::now(),
                    },
                }
            }
        }
    }

    pub fn try_clean(&self, table: Table) -> Result<CleanOutcome> {
        let started_at = Utc::now();
        let input_rows = table.len();

        check_shape(&table)?;

        tracing::info!("🧹 Deduplicating {} rows", input_rows);
        let (table, mut duplicates_removed) = deduplicate(table);

        tracing::info!("🩹 Imputing missing values");
        let (table, imputations) = impute(table, &self.options)?;

        // 補值後可能出現新的重複列
        let (table, late_duplicates) = deduplicate(table);
        duplicates_removed += late_duplicates;

        tracing::info!("✅ Validating {} rows", table.len());
        let mut employees = Vec::with_capacity(table.len());
        let mut rejections = Vec::new();

        for (row, record) in table.into_rows().into_iter().enumerate() {
            match validate_record(&record) {
                ValidationResult::Valid(employee) => employees.push(employee),
                ValidationResult::Invalid { reason } => {
                    tracing::warn!("Row {} rejected: {}", row, reason);
                    rejections.push(Rejection {
                        row,
                        reason,
                        record,
                    });
                }
            }
        }

        tracing::info!(
            "📊 {} rows in, {} duplicates, {} rejected, {} kept",
            input_rows,
            duplicates_removed,
            rejections.len(),
            employees.len()
        );

        Ok(CleanOutcome {
            table: Table::from_employees(&employees),
            report: CleanReport {
                input_rows,
                duplicates_removed,
                imputations,
                rejections,
                output_rows: employees.len(),
                aborted: None,
                started_at,
                finished_at: Utc::now(),
            },
            employees,
        })
    }
}

/// Every cell must belong to a known column and fit its kind.
fn check_shape(table: &Table) -> Result<()> {
    let expected = Schema::employees();
    if table.schema() != &expected {
        return Err(CleanError::processing(format!(
            "unsupported columns {:?}, expected {:?}",
            table.schema().names(),
            expected.names()
        )));
    }

    for (row, record) in table.rows().iter().enumerate() {
        for (column, value) in &record.data {
            let spec = expected
                .column(column)
                .ok_or_else(|| CleanError::UnknownColumn {
                    column: column.clone(),
                })?;

            if value.is_null() {
                continue;
            }
            match spec.kind {
                ColumnKind::Integer | ColumnKind::Number => {
                    numeric_cell(column, row, value)?;
                }
                ColumnKind::Text => {
                    if !matches!(value, Value::String(_)) {
                        return Err(CleanError::ColumnType {
                            column: column.clone(),
                            row,
                            value: value.to_string(),
                        });
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;
    use serde_json::json;

    fn row(name: Value, age: Value, email: &str, salary: Value) -> Record {
        Record::new()
            .with("name", name)
            .with("age", age)
            .with("email", email)
            .with("salary", salary)
    }

    fn table(rows: Vec<Record>) -> Table {
        Table::new(Schema::employees(), rows)
    }

    #[test]
    fn test_clean_keeps_valid_rows_in_order() {
        let input = table(vec![
            row(json!("Ann"), json!(30), "ann@x.io", json!(10)),
            row(json!("Bad"), json!(30), "nope", json!(10)),
            row(json!("Cid"), json!(40), "cid@x.io", json!(20)),
        ]);

        let outcome = CleaningPipeline::default().run(input);

        assert_eq!(outcome.employees.len(), 2);
        assert_eq!(outcome.employees[0].name, "Ann");
        assert_eq!(outcome.employees[1].name, "Cid");
        assert_eq!(outcome.report.rejections.len(), 1);
        assert_eq!(outcome.report.rejections[0].row, 1);
        assert!(outcome.report.aborted.is_none());
    }

    #[test]
    fn test_clean_empty_table() {
        let cleaned = CleaningPipeline::default().clean(table(vec![]));
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_all_invalid_rows_give_empty_table() {
        let input = table(vec![
            row(json!(""), json!(30), "a@b.com", json!(10)),
            row(json!("A"), json!(0), "a@b.com", json!(10)),
        ]);
        let cleaned = CleaningPipeline::default().clean(input);
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_unexpected_error_yields_empty_table() {
        let input = table(vec![
            row(json!("Ann"), json!(30), "ann@x.io", json!(10)),
            row(json!("Bob"), json!("thirty"), "bob@x.io", json!(10)),
        ]);

        let outcome = CleaningPipeline::default().run(input);

        assert!(outcome.table.is_empty());
        assert!(outcome.employees.is_empty());
        assert!(outcome.report.aborted.is_some());
    }

    #[test]
    fn test_unknown_column_is_unexpected() {
        let input = table(vec![row(json!("Ann"), json!(30), "ann@x.io", json!(10))
            .with("phone", "555")]);

        let err = CleaningPipeline::default().try_clean(input).unwrap_err();
        assert!(matches!(err, CleanError::UnknownColumn { .. }));
    }

    #[test]
    fn test_non_text_name_is_unexpected() {
        let input = table(vec![row(json!(12), json!(30), "ann@x.io", json!(10))]);
        let err = CleaningPipeline::default().try_clean(input).unwrap_err();
        assert!(matches!(err, CleanError::ColumnType { ref column, .. } if column == "name"));
    }

    #[test]
    fn test_rows_made_equal_by_imputation_are_collapsed() {
        let input = table(vec![
            row(json!("Ann"), json!(30), "ann@x.io", json!(10)),
            row(json!("Ann"), Value::Null, "ann@x.io", json!(10)),
        ]);

        let outcome = CleaningPipeline::default().run(input);

        assert_eq!(outcome.employees.len(), 1);
        assert_eq!(outcome.report.duplicates_removed, 1);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let input = table(vec![
            row(json!("Ann"), json!(30), "ann@x.io", json!(10.5)),
            row(Value::Null, json!(41), "bob@x.io", Value::Null),
            row(json!("Cid"), Value::Null, "cid@x.io", json!(20)),
            row(json!("Ann"), json!(30), "ann@x.io", json!(10.5)),
        ]);

        let pipeline = CleaningPipeline::default();
        let once = pipeline.clean(input);
        let twice = pipeline.clean(once.clone());

        assert!(!once.is_empty());
        assert_eq!(once, twice);
    }
}
