// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for contact submissions.
//!
//! Each variant carries the server-side diagnostic detail. Clients only
//! ever see the fixed message for its category.

use crate::filter::Signal;
use crate::mailer::DispatchError;
use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Terminal rejection of a submission.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Rate limit exceeded for {key}")]
    RateLimitExceeded { key: String, retry_after: Duration },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Suspected abuse: {0}")]
    SuspectedAbuse(Signal),

    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::SuspectedAbuse(_) => StatusCode::FORBIDDEN,
            Self::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The only text a client is shown.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::RateLimitExceeded { .. } => "Too many requests. Please try again later.",
            Self::Validation(_) => "All fields are required",
            Self::SuspectedAbuse(_) => "Invalid request",
            Self::Dispatch(_) => "Failed to send message",
        }
    }

    /// Metric label for the terminal state.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::RateLimitExceeded { .. } => "rate_limited",
            Self::Validation(_) => "invalid",
            Self::SuspectedAbuse(_) => "suspicious",
            Self::Dispatch(_) => "send_failed",
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.public_message(),
        });

        match self {
            Self::RateLimitExceeded { retry_after, .. } => {
                // Round up so clients never retry inside the window, and
                // never advertise an immediate retry
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                let secs = secs.max(1);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, secs.to_string())],
                    body,
                )
                    .into_response()
            }
            other => (other.status(), body).into_response(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ContactError>;
