//! Field-scoped validation results and the cross-field event rules.
//!
//! Single-field rules are declared with `validator` derives on the input
//! DTOs; [`FieldErrors`] collects those together with the rules that need
//! more than one field, keyed by field path.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Field path to messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the messages from a `validator` run.
    ///
    /// Rules declared without a message fall back to their code.
    pub fn from_validator(errors: &validator::ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid ({})", err.code));
                out.add(field.to_string(), message);
            }
        }
        out
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `Ok` when nothing was recorded, otherwise [`CoreError::InvalidFields`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// An end time, when present, must not precede the start time.
pub fn check_time_range(start: Timestamp, end: Option<Timestamp>, errors: &mut FieldErrors) {
    if let Some(end) = end {
        if end < start {
            errors.add("end_time", "End time must be after the start time");
        }
    }
}

/// Paid events need a non-blank price.
pub fn check_pricing(is_free: bool, price: Option<&str>, errors: &mut FieldErrors) {
    if is_free {
        return;
    }
    match price {
        Some(p) if !p.trim().is_empty() => {}
        _ => errors.add("price", "Price is required for paid events"),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_end_after_start_passes() {
        let mut errors = FieldErrors::new();
        check_time_range(start(), Some(start() + Duration::hours(2)), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_end_equal_to_start_passes() {
        let mut errors = FieldErrors::new();
        check_time_range(start(), Some(start()), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_end_before_start_flags_end_time() {
        let mut errors = FieldErrors::new();
        check_time_range(start(), Some(start() - Duration::minutes(1)), &mut errors);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["end_time"]);
    }

    #[test]
    fn test_missing_end_passes() {
        let mut errors = FieldErrors::new();
        check_time_range(start(), None, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_paid_event_requires_price() {
        let mut errors = FieldErrors::new();
        check_pricing(false, None, &mut errors);
        check_pricing(false, Some("   "), &mut errors);
        assert_eq!(errors.get("price").map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_free_event_ignores_price() {
        let mut errors = FieldErrors::new();
        check_pricing(true, None, &mut errors);
        check_pricing(false, Some("$12"), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.add("title", "Title is required");
        assert_matches!(errors.into_result(), Err(CoreError::InvalidFields(f)) if f.get("title").is_some());
    }

    #[test]
    fn test_display_joins_fields() {
        let mut errors = FieldErrors::new();
        errors.add("title", "Title is required");
        errors.add("price", "Price is required for paid events");
        assert_eq!(
            errors.to_string(),
            "price: Price is required for paid events; title: Title is required"
        );
    }

    #[test]
    fn test_serializes_as_field_map() {
        let mut errors = FieldErrors::new();
        errors.add("end_time", "End time must be after the start time");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["end_time"][0], "End time must be after the start time");
    }
}
