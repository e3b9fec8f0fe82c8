// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay
//!
//! Accepts contact form submissions and relays them to a transactional
//! mail provider after a fixed series of checks:
//!
//! - Per-IP fixed-window rate limiting (5 per hour default)
//! - Honeypot field
//! - Required-field validation
//! - Heuristic bot and spam filtering
//! - Single dispatch attempt with a lazily verified provider

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod gatekeeper;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod metrics;
pub mod validator;

pub use config::Config;
pub use error::ContactError;
pub use filter::{SpamFilter, Verdict};
pub use gatekeeper::{Accepted, Gatekeeper, Inbound};
pub use limiter::{RateLimitResult, RateLimiter};
pub use mailer::{Envelope, MailRelay, Mailer};
pub use validator::{Submission, ValidationResult};
