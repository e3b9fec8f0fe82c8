// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client side of the contact form.
//!
//! [`ContactForm`] mirrors the browser form: it remembers when it was
//! opened and refuses to submit before a minimum fill time has passed.

use crate::validator::Submission;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Minimum time a human needs to fill the form.
pub const DEFAULT_MIN_FILL_TIME: Duration = Duration::from_secs(3);

const GENERIC_FAILURE: &str = "Failed to send message";

/// Sent with every submission; the relay rejects requests without one.
pub const USER_AGENT: &str = concat!("contact-relay-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// What the form shows after a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Success,
    /// Submitted before the minimum fill time; nothing was sent
    TooFast { wait: Duration },
    /// Server or network failure, with the message to display
    Error(String),
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    error: Option<String>,
}

/// Posts submissions to a relay.
#[derive(Debug, Clone)]
pub struct ContactClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ContactClient {
    /// `base_url` is the site root; submissions go to `{base_url}/api/contact`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            endpoint: base.join("api/contact")?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, submission: &Submission) -> SubmitStatus {
        let response = match self.http.post(self.endpoint.clone()).json(submission).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Contact form error");
                return SubmitStatus::Error(GENERIC_FAILURE.to_string());
            }
        };

        let status = response.status();
        let reply = response.json::<Reply>().await.ok();

        if status.is_success() {
            return SubmitStatus::Success;
        }

        let message = reply
            .and_then(|r| r.error)
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        warn!(status = status.as_u16(), error = %message, "Contact form error");
        SubmitStatus::Error(message)
    }
}

/// An open contact form.
#[derive(Debug, Clone)]
pub struct ContactForm {
    pub fields: Submission,
    opened_at: Instant,
    min_fill_time: Duration,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self::with_min_fill_time(DEFAULT_MIN_FILL_TIME)
    }

    pub fn with_min_fill_time(min_fill_time: Duration) -> Self {
        Self {
            fields: Submission::default(),
            opened_at: Instant::now(),
            min_fill_time,
        }
    }

    /// Time left before the form may be submitted.
    pub fn remaining_fill_time(&self) -> Duration {
        self.min_fill_time.saturating_sub(self.opened_at.elapsed())
    }

    /// Submit the form. On success the fields are cleared.
    pub async fn submit(&mut self, client: &ContactClient) -> SubmitStatus {
        let wait = self.remaining_fill_time();
        if !wait.is_zero() {
            debug!(?wait, "Form submitted too quickly, ignoring");
            return SubmitStatus::TooFast { wait };
        }

        let status = client.post(&self.fields).await;
        if status == SubmitStatus::Success {
            self.fields = Submission::default();
        }
        status
    }
}
