// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound mail dispatch.
//!
//! The relay only builds an [`Envelope`] and hands it to a [`Mailer`].
//! Provider connectivity is verified lazily: the first send (or a readiness
//! probe) runs the provider health check, and only a success is remembered.

use crate::validator::Submission;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Longest provider error body kept for logging.
const MAX_ERROR_BODY: usize = 512;

/// Mail dispatch failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Send timed out after {0:?}")]
    Timeout(Duration),
}

/// An outbound message ready for the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub from: String,
    pub reply_to: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    #[serde(skip_serializing)]
    pub received_at: DateTime<Utc>,
}

impl Envelope {
    /// Build the notification for a submission that passed every check.
    pub fn compose(submission: &Submission, from: &str, to: &str) -> Self {
        let name = submission.name.trim();
        let email = submission.email.trim();
        let subject = submission.subject.trim();

        let html = format!(
            "<div>\n  <h2>New Contact Form Submission</h2>\n  \
             <p><strong>From:</strong> {name} ({email})</p>\n  \
             <p><strong>Subject:</strong> {subject}</p>\n  \
             <p><strong>Message:</strong></p>\n  \
             <p>{message}</p>\n</div>\n",
            name = escape_html(name),
            email = escape_html(email),
            subject = escape_html(subject),
            message = escape_html(&submission.message).replace('\n', "<br>"),
        );

        Self {
            from: from.to_string(),
            reply_to: format!("{name} <{email}>"),
            to: to.to_string(),
            subject: format!("Contact Form: {subject}"),
            text: format!("From: {name} ({email})\n\n{}", submission.message),
            html,
            received_at: Utc::now(),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A transactional mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Short transport name for logs.
    fn name(&self) -> &'static str;

    async fn send(&self, envelope: &Envelope) -> Result<(), DispatchError>;

    /// Verify the provider is reachable and accepts our credentials.
    async fn health_check(&self) -> Result<(), DispatchError>;
}

/// Sends through a provider's HTTP API with a bearer token.
pub struct HttpApiMailer {
    client: reqwest::Client,
    api_url: Url,
    health_url: Option<Url>,
    token: Option<String>,
}

impl HttpApiMailer {
    pub fn new(
        api_url: Url,
        health_url: Option<Url>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url,
            health_url,
            token,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl Mailer for HttpApiMailer {
    fn name(&self) -> &'static str {
        "http-api"
    }

    async fn send(&self, envelope: &Envelope) -> Result<(), DispatchError> {
        let response = self
            .authorize(self.client.post(self.api_url.clone()))
            .json(envelope)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Provider accepted message");
            return Ok(());
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    async fn health_check(&self) -> Result<(), DispatchError> {
        // Send endpoints are POST-only; without a dedicated probe URL the
        // first real send is the check.
        let Some(health_url) = &self.health_url else {
            return Ok(());
        };
        let response = self
            .authorize(self.client.get(health_url.clone()))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(DispatchError::Unavailable(format!(
                "health check returned {}",
                response.status()
            )))
        }
    }
}

/// Logs messages instead of delivering them.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, envelope: &Envelope) -> Result<(), DispatchError> {
        info!(
            to = %envelope.to,
            reply_to = %envelope.reply_to,
            subject = %envelope.subject,
            received_at = %envelope.received_at,
            "Dry-run delivery"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DispatchError> {
        Ok(())
    }
}

/// A [`Mailer`] with lazy health verification and a send timeout.
pub struct MailRelay {
    mailer: Arc<dyn Mailer>,
    verified: AtomicBool,
    timeout: Duration,
}

impl MailRelay {
    pub fn new(mailer: Arc<dyn Mailer>, timeout: Duration) -> Self {
        Self {
            mailer,
            verified: AtomicBool::new(false),
            timeout,
        }
    }

    pub fn transport(&self) -> &'static str {
        self.mailer.name()
    }

    /// Whether a health check has succeeded since the last failure.
    pub fn is_verified(&self) -> bool {
        self.verified.load(Ordering::Acquire)
    }

    async fn run_health_check(&self) -> Result<(), DispatchError> {
        let result = match tokio::time::timeout(self.timeout, self.mailer.health_check()).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Timeout(self.timeout)),
        };

        match &result {
            Ok(()) => {
                if !self.verified.swap(true, Ordering::AcqRel) {
                    info!(transport = self.transport(), "Mail provider verified");
                }
            }
            Err(err) => {
                self.verified.store(false, Ordering::Release);
                warn!(transport = self.transport(), error = %err, "Mail provider health check failed");
            }
        }
        result
    }

    /// Run the health check unless one has already passed.
    pub async fn ensure_ready(&self) -> Result<(), DispatchError> {
        if self.is_verified() {
            return Ok(());
        }
        self.run_health_check().await
    }

    /// Always re-run the health check, for readiness probes.
    pub async fn readiness(&self) -> Result<(), DispatchError> {
        self.run_health_check().await
    }

    /// Send once. Errors are returned to the caller; nothing is retried.
    ///
    /// The timeout covers the health check and the send together.
    pub async fn send(&self, envelope: &Envelope) -> Result<(), DispatchError> {
        let attempt = async {
            self.ensure_ready().await?;
            self.mailer.send(envelope).await
        };
        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Timeout(self.timeout)),
        }
    }
}
