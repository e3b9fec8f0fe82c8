// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Abuse patterns for security testing.

/// What each request in an attack carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// A legitimate-looking message from a browser
    Clean,
    /// A message with a link in it
    LinkSpam,
    /// A clean message from an automation tool
    BotAgent,
    /// A clean message with no user agent at all
    NoAgent,
    /// The hidden field is filled in
    Honeypot,
    /// Empty required fields
    EmptyFields,
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of unique IPs to simulate
    pub unique_ips: usize,
    pub payload: Payload,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 1,
            payload: Payload::Clean,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single IP flood - one client hammering the form.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 60,
            unique_ips: 1,
            ..Default::default()
        }
    }

    /// Distributed flood - many IPs, each under the limit.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 300,
            unique_ips: 100,
            ..Default::default()
        }
    }

    /// Link spam spread across IPs to dodge the rate limit.
    pub fn link_spam() -> Self {
        Self {
            total_requests: 40,
            unique_ips: 40,
            payload: Payload::LinkSpam,
        }
    }

    /// Headless browsers and crawlers filling in the form.
    pub fn bot_agents() -> Self {
        Self {
            total_requests: 40,
            unique_ips: 20,
            payload: Payload::BotAgent,
        }
    }

    /// Raw HTTP clients that send no user agent.
    pub fn no_agent() -> Self {
        Self {
            total_requests: 20,
            unique_ips: 10,
            payload: Payload::NoAgent,
        }
    }

    /// Naive bots that fill every field, including the hidden one.
    pub fn honeypot_fill() -> Self {
        Self {
            total_requests: 20,
            unique_ips: 10,
            payload: Payload::Honeypot,
        }
    }

    /// Empty form posts.
    pub fn empty_fields() -> Self {
        Self {
            total_requests: 20,
            unique_ips: 10,
            payload: Payload::EmptyFields,
        }
    }

    /// Requests each IP sends, rounded up.
    pub fn requests_per_ip(&self) -> usize {
        self.total_requests.div_ceil(self.unique_ips.max(1))
    }
}
