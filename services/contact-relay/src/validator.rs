// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission payload and required-field validation.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

/// A contact form submission. Absent or `null` fields deserialize as empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Submission {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub message: String,
    /// Hidden form field; humans leave it empty
    #[serde(deserialize_with = "null_as_empty")]
    pub honeypot: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Submission {
    /// Whether the hidden field was filled in.
    pub fn honeypot_tripped(&self) -> bool {
        !self.honeypot.is_empty()
    }
}

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Submission is valid
    Valid,
    /// Submission is invalid
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }
}

/// Decode a request body into a [`Submission`].
pub fn parse_submission(body: &[u8]) -> Result<Submission, ValidationError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Request body is not a submission");
        ValidationError::MalformedBody(e.to_string())
    })
}

/// Check that every required field carries non-whitespace content.
pub fn validate_required(submission: &Submission) -> ValidationResult {
    let fields = [
        ("name", &submission.name),
        ("email", &submission.email),
        ("subject", &submission.subject),
        ("message", &submission.message),
    ];

    for (field, value) in fields {
        if value.trim().is_empty() {
            debug!(field, "Missing required field");
            return ValidationResult::Invalid(ValidationError::MissingField(field));
        }
    }

    ValidationResult::Valid
}
