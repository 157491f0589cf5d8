use crate::domain::model::{Schema, Table};
use crate::utils::error::Result;
use serde_json::{json, Value};

/// Six rows covering each cleaning step: an exact duplicate, gaps in the
/// name, age and salary columns, a malformed email and a negative salary.
pub fn sample_table() -> Result<Table> {
    let columns = vec![
        (
            "name",
            vec![
                json!("Alice"),
                json!("Bob"),
                json!("Alice"),
                Value::Null,
                json!("Dave"),
                json!("Eve"),
            ],
        ),
        (
            "age",
            vec![json!(25), Value::Null, json!(25), json!(35), json!(40), json!(28)],
        ),
        (
            "email",
            vec![
                json!("alice@example.com"),
                json!("bob@example.com"),
                json!("alice@example.com"),
                json!("charlie@example.com"),
                json!("dave-at-example"),
                json!("eve@example.com"),
            ],
        ),
        (
            "salary",
            vec![
                json!(50000),
                json!(60000),
                json!(50000),
                json!(70000),
                Value::Null,
                json!(-1000),
            ],
        ),
    ];

    Table::from_columns(Schema::employees(), columns)
}
