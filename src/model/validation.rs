//! Field rule checks against a serialized resource.

use crate::error::AppError;
use crate::model::{Format, ResourceDescriptor, Rules};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern"))
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate every declared writable field of `row` against its rules.
    pub fn validate(row: &Map<String, Value>, resource: &ResourceDescriptor) -> Result<(), AppError> {
        for field in resource.writable_fields() {
            let val = row.get(field.name).unwrap_or(&Value::Null);
            if field.rules.required && is_blank(val) {
                return Err(AppError::Validation(format!("{} is required", field.name)));
            }
            validate_field(field.name, val, &field.rules)?;
        }
        Ok(())
    }
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn validate_field(name: &str, v: &Value, rules: &Rules) -> Result<(), AppError> {
    // Optional text fields serialize as "" when unset; rules only apply to supplied values.
    let Some(s) = v.as_str().filter(|s| !s.is_empty()) else {
        return Ok(());
    };
    if let Some(Format::Email) = rules.format {
        if !email_pattern().is_match(s) {
            return Err(AppError::Validation(format!("{} must be a valid email", name)));
        }
    }
    let len = s.chars().count();
    if let Some(max) = rules.max_length {
        if len > max {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                name, max
            )));
        }
    }
    if let Some(min) = rules.min_length {
        if len < min {
            return Err(AppError::Validation(format!(
                "{} must be at least {} characters",
                name, min
            )));
        }
    }
    if !rules.allowed.is_empty() && !rules.allowed.contains(&s) {
        return Err(AppError::Validation(format!(
            "{} must be one of: {}",
            name,
            rules.allowed.join(", ")
        )));
    }
    Ok(())
}
