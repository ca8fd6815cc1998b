//! Request payloads validated at the HTTP boundary.
//!
//! Each form derives [`validator::Validate`]; a failed validation yields one
//! entry per violated constraint keyed by field name.

use std::borrow::Cow;

use validator::ValidationError;

pub mod category;
pub mod product;

/// Trims optional text and drops it when nothing is left.
fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Builds a `required` error unless `value` has non-whitespace content.
fn require_text(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required").with_message(Cow::Borrowed(message)))
    } else {
        Ok(())
    }
}
