// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission pipeline.
//!
//! Checks run in a fixed order and the first failing one ends the request:
//!
//! 1. rate limit (429)
//! 2. honeypot (silent 200, nothing sent)
//! 3. required fields (400)
//! 4. heuristic filter (403)
//! 5. mail dispatch (200, or 500 on failure; never retried)

use crate::config::Config;
use crate::error::{ContactError, Result};
use crate::filter::{Probe, SpamFilter, Verdict};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::mailer::{Envelope, MailRelay};
use crate::metrics::Metrics;
use crate::validator::{parse_submission, validate_required, ValidationResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// A submission that ended successfully from the client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    /// Message handed to the mail provider
    Sent,
    /// Honeypot was filled; acknowledged without sending
    Discarded,
}

impl Accepted {
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Discarded => "honeypot",
        }
    }
}

/// What the HTTP layer knows about one request.
#[derive(Debug, Clone, Copy)]
pub struct Inbound<'a> {
    /// Rate limit key, normally the client IP
    pub client_key: &'a str,
    pub user_agent: Option<&'a str>,
    /// Raw request body
    pub body: &'a [u8],
}

/// Owns every check a submission passes through.
pub struct Gatekeeper {
    limiter: RateLimiter,
    filter: SpamFilter,
    relay: MailRelay,
    metrics: Arc<Metrics>,
    mail_from: String,
    mail_to: String,
}

impl Gatekeeper {
    pub fn new(
        config: &Config,
        relay: MailRelay,
        metrics: Arc<Metrics>,
    ) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            limiter: RateLimiter::new(config.rate_limit.clone()),
            filter: SpamFilter::new(&config.filter)?,
            relay,
            metrics,
            mail_from: config.mail.from.clone(),
            mail_to: config.mail.to.clone(),
        })
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn relay(&self) -> &MailRelay {
        &self.relay
    }

    /// Run a submission through the pipeline and record its outcome.
    pub async fn process(&self, inbound: Inbound<'_>) -> Result<Accepted> {
        let result = self.evaluate(inbound).await;

        match &result {
            Ok(accepted) => {
                self.metrics.record_outcome(accepted.outcome());
            }
            Err(err @ ContactError::Dispatch(_)) => {
                error!(client = inbound.client_key, error = %err, "Contact form error");
                self.metrics.record_outcome(err.outcome());
            }
            Err(err) => {
                info!(client = inbound.client_key, error = %err, "Submission rejected");
                self.metrics.record_outcome(err.outcome());
            }
        }

        result
    }

    async fn evaluate(&self, inbound: Inbound<'_>) -> Result<Accepted> {
        if let RateLimitResult::Limited { retry_after } =
            self.limiter.check(inbound.client_key).await
        {
            return Err(ContactError::RateLimitExceeded {
                key: inbound.client_key.to_string(),
                retry_after,
            });
        }

        let submission = parse_submission(inbound.body)?;

        if submission.honeypot_tripped() {
            info!(client = inbound.client_key, "Honeypot filled, discarding submission");
            return Ok(Accepted::Discarded);
        }

        if let ValidationResult::Invalid(err) = validate_required(&submission) {
            return Err(err.into());
        }

        let verdict = self.filter.inspect(&Probe {
            user_agent: inbound.user_agent,
            email: &submission.email,
            message: &submission.message,
        });
        if let Verdict::Suspicious(signal) = verdict {
            return Err(ContactError::SuspectedAbuse(signal));
        }

        let envelope = Envelope::compose(&submission, &self.mail_from, &self.mail_to);
        let started = Instant::now();
        let sent = self.relay.send(&envelope).await;
        self.metrics.observe_dispatch(started.elapsed().as_secs_f64());
        sent?;

        debug!(client = inbound.client_key, transport = self.relay.transport(), "Message sent");
        Ok(Accepted::Sent)
    }
}
