use serde::Serialize;

use crate::error::AppError;

/// One failed check on a named request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Implemented by each request body; the handler for an intent validates
/// with that intent's own checks.
pub trait Validate {
    fn field_errors(&self) -> Vec<FieldError>;

    fn validate(&self) -> Result<(), AppError> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Runs named checks in order and keeps every failure.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whitespace-only counts as missing.
    pub fn require(mut self, field: &'static str, value: &str, message: &'static str) -> Self {
        if value.trim().is_empty() {
            self.errors.push(FieldError { field, message });
        }
        self
    }

    pub fn require_some<T>(
        mut self,
        field: &'static str,
        value: Option<&T>,
        message: &'static str,
    ) -> Self {
        if value.is_none() {
            self.errors.push(FieldError { field, message });
        }
        self
    }

    pub fn finish(self) -> Vec<FieldError> {
        self.errors
    }
}

/// `"field: message, field: message"`
pub fn field_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}
