//! User-correctable validation results.
//!
//! A rejected submission keeps every message that applies, in the order the
//! checks ran, so a form can be re-rendered with all annotations at once.

use serde::Serialize;

/// A single validation message.
///
/// `field` names the input the message belongs to; `None` marks a
/// form-level message that is not tied to one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The input field, or `None` for a form-level message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    /// Human-readable message.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// An ordered collection of validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a message to a field.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: Some(field),
            message: message.into(),
        });
    }

    /// Attach a form-level message.
    pub fn add_form(&mut self, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: None,
            message: message.into(),
        });
    }

    /// Record `message` against `field` if `value` is blank.
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    /// Whether no message was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All messages in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages recorded against `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == Some(field))
            .map(|e| e.message.as_str())
    }

    /// Form-level messages.
    pub fn form_messages(&self) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(|e| e.field.is_none())
            .map(|e| e.message.as_str())
    }

    /// Whether any message, field or form level, equals `message`.
    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.errors.iter().any(|e| e.message == message)
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// The outcome of a create or edit request.
///
/// `Rejected` is a normal outcome, not a fault: nothing was written and the
/// caller should show the messages next to the submitted values.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    /// The record was written.
    Saved(T),
    /// Validation failed; nothing was written.
    Rejected(ValidationErrors),
}

impl<T> Submission<T> {
    /// Whether the record was written.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    /// The saved record, if any.
    #[must_use]
    pub fn saved(self) -> Option<T> {
        match self {
            Self::Saved(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// The validation messages, if the submission was rejected.
    #[must_use]
    pub fn rejected(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Saved(_) => None,
            Self::Rejected(errors) => Some(errors),
        }
    }
}
