use std::fmt;

use validator::{Validate, ValidationError};

/// The first rule a request body broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    /// Machine-readable rule code, e.g. `empty` or `invalid_email`.
    pub reason: String,
    /// Human-readable message, e.g. `Name is required`.
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
            message: message.into(),
        }
    }

    fn from_error(field: &str, error: &ValidationError) -> Self {
        Self {
            field: field.to_string(),
            reason: error.code.to_string(),
            message: error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field)),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.reason)
    }
}

/// Validation that reports a single violation, picked by the declared field
/// order instead of whatever order the error map iterates in.
pub trait OrderedValidate: Validate {
    const FIELD_ORDER: &'static [&'static str];

    fn validate_in_order(&self) -> Result<(), FieldViolation> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let field_errors = errors.field_errors();

        for field in Self::FIELD_ORDER {
            if let Some(error) = field_errors.get(*field).and_then(|errs| errs.first()) {
                return Err(FieldViolation::from_error(field, error));
            }
        }

        // Fields outside FIELD_ORDER: fall back to a stable alphabetical pick.
        let mut remaining: Vec<_> = field_errors.iter().collect();
        remaining.sort_by(|(a, _), (b, _)| a.cmp(b));
        match remaining
            .into_iter()
            .find_map(|(field, errs)| errs.first().map(|e| (field.to_string(), e)))
        {
            Some((field, error)) => Err(FieldViolation::from_error(&field, error)),
            None => Err(FieldViolation::new("body", "invalid", errors.to_string())),
        }
    }
}
