//! Per-field rules for employee rows.
//!
//! Each rule reads one field of a [`Record`] and either returns the value
//! coerced to its declared type or the rejection reason.

use crate::domain::model::{Employee, Record, ValidationResult};
use serde_json::Value;

type RuleResult<T> = std::result::Result<T, String>;

fn missing(field: &str) -> String {
    format!("{} is missing", field)
}

fn text_field<'a>(record: &'a Record, field: &str) -> RuleResult<&'a str> {
    match record.get(field) {
        None => Err(missing(field)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(format!("{} must be text", field)),
    }
}

fn number_field(record: &Record, field: &str) -> RuleResult<Option<f64>> {
    match record.get(field) {
        None => Err(missing(field)),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => Ok(s.trim().parse::<f64>().ok().filter(|n| n.is_finite())),
        Some(_) => Ok(None),
    }
}

pub fn validate_name(record: &Record) -> RuleResult<String> {
    let name = text_field(record, "name")?;
    if name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    Ok(name.to_string())
}

pub fn validate_age(record: &Record) -> RuleResult<u32> {
    let reason = || "age must be a positive integer".to_string();

    let age = number_field(record, "age")?.ok_or_else(reason)?;
    if age <= 0.0 || age.fract() != 0.0 || age > f64::from(u32::MAX) {
        return Err(reason());
    }
    Ok(age as u32)
}

pub fn validate_email(record: &Record) -> RuleResult<String> {
    let email = text_field(record, "email")?;
    if !(email.contains('@') && email.contains('.')) {
        return Err("email must contain '@' and '.'".to_string());
    }
    Ok(email.to_string())
}

pub fn validate_salary(record: &Record) -> RuleResult<f64> {
    let salary = number_field(record, "salary")?
        .ok_or_else(|| "salary must be a number".to_string())?;
    if salary < 0.0 {
        return Err("salary must not be negative".to_string());
    }
    Ok(salary)
}

fn coerce(record: &Record) -> RuleResult<Employee> {
    Ok(Employee {
        name: validate_name(record)?,
        age: validate_age(record)?,
        email: validate_email(record)?,
        salary: validate_salary(record)?,
    })
}

/// Apply the rules in field order; the first failure becomes the reason.
pub fn validate_record(record: &Record) -> ValidationResult {
    match coerce(record) {
        Ok(employee) => ValidationResult::Valid(employee),
        Err(reason) => ValidationResult::Invalid { reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str, age: Value, email: &str, salary: Value) -> Record {
        Record::new()
            .with("name", name)
            .with("age", age)
            .with("email", email)
            .with("salary", salary)
    }

    fn reason_of(result: ValidationResult) -> String {
        match result {
            ValidationResult::Invalid { reason } => reason,
            ValidationResult::Valid(e) => panic!("expected rejection, got {:?}", e),
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        let r = record("", json!(5), "a@b.com", json!(10));
        assert_eq!(reason_of(validate_record(&r)), "name must not be empty");

        let r = record("   ", json!(5), "a@b.com", json!(10));
        assert_eq!(reason_of(validate_record(&r)), "name must not be empty");
    }

    #[test]
    fn test_non_positive_age_rejected() {
        let r = record("A", json!(0), "a@b.com", json!(10));
        assert_eq!(reason_of(validate_record(&r)), "age must be a positive integer");

        let r = record("A", json!(-3), "a@b.com", json!(10));
        assert_eq!(reason_of(validate_record(&r)), "age must be a positive integer");
    }

    #[test]
    fn test_fractional_age_rejected() {
        let r = record("A", json!(23.5), "a@b.com", json!(10));
        assert_eq!(reason_of(validate_record(&r)), "age must be a positive integer");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let r = record("A", json!(1), "bad", json!(10));
        assert_eq!(reason_of(validate_record(&r)), "email must contain '@' and '.'");

        let r = record("A", json!(1), "a@bcom", json!(10));
        assert_eq!(reason_of(validate_record(&r)), "email must contain '@' and '.'");
    }

    #[test]
    fn test_negative_salary_rejected() {
        let r = record("A", json!(1), "a@b.com", json!(-5));
        assert_eq!(reason_of(validate_record(&r)), "salary must not be negative");
    }

    #[test]
    fn test_zero_salary_accepted() {
        let r = record("A", json!(1), "a@b.com", json!(0));
        assert_eq!(
            validate_record(&r),
            ValidationResult::Valid(Employee {
                name: "A".to_string(),
                age: 1,
                email: "a@b.com".to_string(),
                salary: 0.0,
            })
        );
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let r = record("", json!(0), "bad", json!(-1));
        assert_eq!(reason_of(validate_record(&r)), "name must not be empty");

        let r = record("A", json!(0), "bad", json!(-1));
        assert_eq!(reason_of(validate_record(&r)), "age must be a positive integer");
    }

    #[test]
    fn test_values_are_coerced() {
        let r = record("A", json!(30.0), "a@b.com", json!("1200.5"));
        match validate_record(&r) {
            ValidationResult::Valid(e) => {
                assert_eq!(e.age, 30);
                assert_eq!(e.salary, 1200.5);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_rejected() {
        let r = record("A", Value::Null, "a@b.com", json!(1));
        assert_eq!(reason_of(validate_record(&r)), "age is missing");
    }
}
