//! The single error kind raised by record validation.

use quill_http::error::AppError;
use serde_json::json;
use thiserror::Error;

/// A rejected creation or mutation. `Display` is the human-readable reason.
///
/// Only the first violated rule is reported; callers never see an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,
    #[error("duplicate name")]
    DuplicateName,
    #[error("invalid phone number")]
    InvalidPhoneNumber,
    #[error("title required")]
    TitleRequired,
    #[error("clickbait title")]
    ClickbaitTitle,
    #[error("content too short")]
    ContentTooShort,
    #[error("invalid category")]
    InvalidCategory,
    #[error("summary too long")]
    SummaryTooLong,
}

impl ValidationError {
    /// Name of the field the violated rule guards.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NameRequired | ValidationError::DuplicateName => "name",
            ValidationError::InvalidPhoneNumber => "phone_number",
            ValidationError::TitleRequired | ValidationError::ClickbaitTitle => "title",
            ValidationError::ContentTooShort => "content",
            ValidationError::InvalidCategory => "category",
            ValidationError::SummaryTooLong => "summary",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let reason = err.to_string();
        AppError::validation(
            vec![json!({ "field": err.field(), "error": reason })],
            reason,
        )
    }
}

/// Present and not blank once surrounding whitespace is ignored. The value is
/// returned as given, untrimmed.
pub(crate) fn required(value: Option<String>, err: ValidationError) -> Result<String, ValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(err),
    }
}

/// Length in characters (Unicode scalar values), not bytes.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
