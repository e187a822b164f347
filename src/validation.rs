//! Field rules shared by the request schemas.
//!
//! Every rule appends to a [`Violations`] collector instead of returning early,
//! so a failed validation reports every offending field at once.

use std::fmt;

use thiserror::Error;
use url::Url;

/// A single rejected field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation failure listing every violated field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_issues(&self.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Whether any issue was reported against `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// Messages reported against `field`, in the order they were found.
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.field == field)
            .map(|issue| issue.message.as_str())
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(FieldIssue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects field issues while a schema is evaluated.
#[derive(Debug, Default)]
pub struct Violations {
    issues: Vec<FieldIssue>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field,
            message: message.into(),
        });
    }

    /// String must contain at least one character.
    pub fn non_empty(&mut self, field: &'static str, value: &str) {
        if value.is_empty() {
            self.push(field, format!("{field} is required"));
        }
    }

    /// String must parse as an absolute URL.
    pub fn absolute_url(&mut self, field: &'static str, value: &str) {
        if Url::parse(value).is_err() {
            self.push(field, format!("{field} must be a valid URL"));
        }
    }

    /// Number must be at least `min`.
    pub fn at_least<N>(&mut self, field: &'static str, value: N, min: N)
    where
        N: PartialOrd + fmt::Display + Copy,
    {
        if value < min {
            self.push(field, format!("{field} must be greater than or equal to {min}"));
        }
    }

    /// Number must fall in `min..=max`.
    pub fn within<N>(&mut self, field: &'static str, value: N, min: N, max: N)
    where
        N: PartialOrd + fmt::Display + Copy,
    {
        if value < min || value > max {
            self.push(field, format!("{field} must be between {min} and {max}"));
        }
    }

    /// Value must be one of `allowed`.
    pub fn one_of<N>(&mut self, field: &'static str, value: N, allowed: &[N])
    where
        N: PartialEq + fmt::Display + Copy,
    {
        if !allowed.contains(&value) {
            let allowed = allowed
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            self.push(field, format!("{field} must be one of: {allowed}"));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Hand back `value` when nothing was violated.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}
