pub mod auth;
pub mod authoring;
pub mod listing;
pub mod scoring;

use std::fmt;

/// Identity of an authenticated user. Services take `Option<UserId>` where
/// `None` means the caller is anonymous.
pub type UserId = i64;

/// A rule-violating input, reported back to the form that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of a domain operation. Storage failures travel separately as the
/// `Err` arm of the surrounding `color_eyre::Result`.
#[derive(Debug)]
pub enum Outcome<T> {
    Done(T),
    /// Input broke a rule; nothing was written.
    Invalid(ValidationError),
    /// The caller may not perform this operation on this resource.
    Forbidden,
    /// The addressed resource does not exist.
    NotFound,
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }
}
