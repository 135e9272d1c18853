//! Form validation primitives.
//!
//! Forms (checkout, review, product) validate every field and collect the
//! failures into [`FieldErrors`], which the templates render inline next to
//! each input.

use thiserror::Error;

/// Result type for single-field validators.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{} is required", humanize(.field))]
    Required { field: &'static str },

    /// Field value is too short.
    #[error("{} must be at least {min} characters", humanize(.field))]
    TooShort { field: &'static str, min: usize },

    /// Field value is too long.
    #[error("{} must be at most {max} characters", humanize(.field))]
    TooLong { field: &'static str, max: usize },

    /// Numeric value is out of range.
    #[error("{} must be between {min} and {max}", humanize(.field))]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Invalid format.
    #[error("{} {reason}", humanize(.field))]
    InvalidFormat {
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    /// Name of the form field this error belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}

/// Turns a field key (`postal_code`) into a sentence start (`Postal code`).
fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Field name to message, in the order the errors were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(String, String)>);

impl FieldErrors {
    /// An empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a message for a field. The first message for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if !self.0.iter().any(|(f, _)| *f == field) {
            self.0.push((field, message.into()));
        }
    }

    /// Record a [`ValidationError`] under its own field name.
    pub fn push(&mut self, error: &ValidationError) {
        self.add(error.field(), error.to_string());
    }

    /// Record the error of a validator result, passing the value through.
    pub fn check<T>(&mut self, result: ValidationResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(&error);
                None
            }
        }
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, message)| message.as_str())
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the collected errors when at least one field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Trims the value and requires it to be non-empty.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] for blank input.
pub fn required<'a>(field: &'static str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(value)
}

/// Requires a trimmed value with a character count in `min..=max`.
///
/// # Errors
///
/// Returns `Required`, `TooShort` or `TooLong`.
pub fn length_between<'a>(
    field: &'static str,
    value: &'a str,
    min: usize,
    max: usize,
) -> ValidationResult<&'a str> {
    let value = required(field, value)?;
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}
