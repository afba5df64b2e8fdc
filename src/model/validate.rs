//! Field validation primitives shared by the entity payloads.
//!
//! # Purpose
//! Collects every violated constraint into a field → message map so a client
//! sees all problems in one response instead of fixing them one at a time.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

/// Accumulated validation failures keyed by field name.
///
/// # What it does
/// Wraps a `BTreeMap` so the serialized error body has a stable field order.
///
/// # Why it exists
/// Payload validation must report every violated field, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Finish a validation pass: `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Require a non-blank string field, enforcing a maximum length.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Option<String> {
    match value {
        None => {
            errors.push(field, "this field is required");
            None
        }
        Some(text) if text.trim().is_empty() => {
            errors.push(field, "this field may not be blank");
            None
        }
        Some(text) if text.chars().count() > max_len => {
            errors.push(
                field,
                format!("ensure this field has no more than {max_len} characters"),
            );
            None
        }
        Some(text) => Some(text.to_string()),
    }
}

/// Bound an optional string field; absent values pass through untouched.
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Option<String> {
    match value {
        None => None,
        Some(text) if text.chars().count() > max_len => {
            errors.push(
                field,
                format!("ensure this field has no more than {max_len} characters"),
            );
            None
        }
        Some(text) => Some(text.to_string()),
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain.
///
/// Full RFC 5321 parsing is deliberately out of scope; this rejects the
/// obviously malformed input a web form produces.
pub fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next();
    let valid = match domain {
        Some(domain) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.push(field, "enter a valid email address");
    }
}

/// Parse an enumerated choice, recording a violation for unknown values.
pub fn choice<T>(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    match parse(value) {
        Some(parsed) => Some(parsed),
        None => {
            errors.push(field, format!("\"{value}\" is not a valid choice"));
            None
        }
    }
}

/// Donation amounts must be strictly positive and finite.
pub fn positive_amount(errors: &mut ValidationErrors, field: &str, value: f64) -> Option<f64> {
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        errors.push(field, "ensure this value is greater than 0");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_missing_blank_and_long() {
        let mut errors = ValidationErrors::new();
        assert!(required_text(&mut errors, "name", None, 100).is_none());
        assert!(required_text(&mut errors, "breed", Some("   "), 100).is_none());
        let long = "x".repeat(101);
        assert!(required_text(&mut errors, "other", Some(&long), 100).is_none());
        assert_eq!(errors.0.len(), 3);
        assert_eq!(errors.0["name"], "this field is required");
        assert_eq!(errors.0["breed"], "this field may not be blank");
    }

    #[test]
    fn required_text_passes_valid_input() {
        let mut errors = ValidationErrors::new();
        let value = required_text(&mut errors, "name", Some("Rex"), 100);
        assert_eq!(value.as_deref(), Some("Rex"));
        assert!(errors.is_empty());
    }

    #[test]
    fn email_rules() {
        let cases = [
            ("rex@example.com", true),
            ("no-at-sign", false),
            ("@example.com", false),
            ("user@", false),
            ("user@nodot", false),
            ("user@.com", false),
            ("user name@example.com", false),
        ];
        for (input, ok) in cases {
            let mut errors = ValidationErrors::new();
            check_email(&mut errors, "email", input);
            assert_eq!(errors.is_empty(), ok, "email case: {input}");
        }
    }

    #[test]
    fn positive_amount_rejects_zero_negative_and_nan() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut errors = ValidationErrors::new();
            assert!(positive_amount(&mut errors, "amount", bad).is_none());
            assert!(!errors.is_empty());
        }
    }

    #[test]
    fn display_joins_fields_in_order() {
        let mut errors = ValidationErrors::new();
        errors.push("b", "second");
        errors.push("a", "first");
        assert_eq!(errors.to_string(), "a: first; b: second");
    }
}
