use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::utils::error::{CleanError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Integer,
    Number,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// Ordered column layout of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// name / age / email / salary
    pub fn employees() -> Self {
        Self::new(vec![
            ColumnSpec::new("name", ColumnKind::Text),
            ColumnSpec::new("age", ColumnKind::Integer),
            ColumnSpec::new("email", ColumnKind::Text),
            ColumnSpec::new("salary", ColumnKind::Number),
        ])
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::employees()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.data.insert(column.to_string(), value.into());
        self
    }

    /// `None` for absent keys and JSON `null` alike.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column).filter(|v| !v.is_null())
    }

    pub fn is_missing(&self, column: &str) -> bool {
        self.get(column).is_none()
    }
}

/// Rows plus the schema they follow. Row order is the only identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Record>,
}

impl Table {
    pub fn new(schema: Schema, rows: Vec<Record>) -> Self {
        Self { schema, rows }
    }

    pub fn empty(schema: Schema) -> Self {
        Self::new(schema, Vec::new())
    }

    /// 由「欄位名稱 -> 值列表」建立表格，各欄長度必須一致
    pub fn from_columns(schema: Schema, columns: Vec<(&str, Vec<Value>)>) -> Result<Self> {
        let row_count = columns.first().map(|(_, values)| values.len()).unwrap_or(0);

        let mut rows = vec![Record::new(); row_count];
        for (name, values) in columns {
            if values.len() != row_count {
                return Err(CleanError::processing(format!(
                    "column '{}' has {} values, expected {}",
                    name,
                    values.len(),
                    row_count
                )));
            }
            for (row, value) in rows.iter_mut().zip(values) {
                row.data.insert(name.to_string(), value);
            }
        }

        Ok(Self::new(schema, rows))
    }

    pub fn from_employees(employees: &[Employee]) -> Self {
        Self::new(
            Schema::employees(),
            employees.iter().map(Employee::to_record).collect(),
        )
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Record] {
        &mut self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<&'a Value>> {
        self.rows.iter().map(move |r| r.get(column))
    }
}

/// A row that passed every field rule, coerced to its declared types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub salary: f64,
}

impl Employee {
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("name", self.name.clone())
            .with("age", self.age)
            .with("email", self.email.clone())
            .with("salary", self.salary)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(Employee),
    Invalid { reason: String },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub row: usize,
    pub reason: String,
    pub record: Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputeStrategy {
    Mean,
    Mode,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Imputation {
    pub column: String,
    pub strategy: ImputeStrategy,
    pub value: Value,
    pub filled: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanReport {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub imputations: Vec<Imputation>,
    pub rejections: Vec<Rejection>,
    pub output_rows: usize,
    /// Set when the run was abandoned and produced an empty table.
    pub aborted: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub table: Table,
    pub employees: Vec<Employee>,
    pub report: CleanReport,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub employees: Vec<Employee>,
    pub report: CleanReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_columns_builds_rows_in_order() {
        let table = Table::from_columns(
            Schema::employees(),
            vec![
                ("name", vec![json!("A"), json!("B")]),
                ("age", vec![json!(1), Value::Null]),
            ],
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].get("name"), Some(&json!("A")));
        assert!(table.rows()[1].is_missing("age"));
        assert!(table.rows()[1].is_missing("salary"));
    }

    #[test]
    fn test_from_columns_rejects_ragged_columns() {
        let result = Table::from_columns(
            Schema::employees(),
            vec![
                ("name", vec![json!("A"), json!("B")]),
                ("age", vec![json!(1)]),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_employee_round_trips_through_record() {
        let employee = Employee {
            name: "A".to_string(),
            age: 30,
            email: "a@b.com".to_string(),
            salary: 10.5,
        };
        let record = employee.to_record();
        assert_eq!(record.get("age").and_then(Value::as_u64), Some(30));
        assert_eq!(record.get("salary").and_then(Value::as_f64), Some(10.5));
    }
}
