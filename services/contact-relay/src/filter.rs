// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Heuristic bot and spam filter.
//!
//! The filter is an ordered list of independent rules. Each rule looks at
//! one part of the submission; the first rule that matches decides the
//! verdict. Deny-lists come from [`FilterConfig`].

use crate::config::FilterConfig;
use regex::Regex;
use std::fmt;
use tracing::debug;

/// Which rule flagged a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// No user-agent header
    MissingUserAgent,
    /// User-agent names an automation tool
    AutomationAgent,
    /// Message contains HTML tags
    HtmlMarkup,
    /// Message contains BBCode links
    ForumMarkup,
    /// Message contains a blocked keyword
    BlockedKeyword,
    /// Message contains a link
    RawUrl,
    /// Email contains a long run of digits
    DigitRun,
    /// Email contains a long random-looking token
    RandomToken,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingUserAgent => "missing_user_agent",
            Self::AutomationAgent => "automation_agent",
            Self::HtmlMarkup => "html_markup",
            Self::ForumMarkup => "forum_markup",
            Self::BlockedKeyword => "blocked_keyword",
            Self::RawUrl => "raw_url",
            Self::DigitRun => "digit_run",
            Self::RandomToken => "random_token",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a request the rules inspect.
#[derive(Debug, Clone, Copy)]
pub struct Probe<'a> {
    pub user_agent: Option<&'a str>,
    pub email: &'a str,
    pub message: &'a str,
}

/// Outcome of running the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Clean,
    Suspicious(Signal),
}

impl Verdict {
    pub fn is_suspicious(&self) -> bool {
        matches!(self, Verdict::Suspicious(_))
    }
}

/// A single predicate over a [`Probe`].
pub trait Rule: Send + Sync {
    /// Signal reported when this rule matches.
    fn signal(&self) -> Signal;

    fn matches(&self, probe: &Probe<'_>) -> bool;
}

struct MissingUserAgent;

impl Rule for MissingUserAgent {
    fn signal(&self) -> Signal {
        Signal::MissingUserAgent
    }

    fn matches(&self, probe: &Probe<'_>) -> bool {
        probe.user_agent.map_or(true, |ua| ua.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    UserAgent,
    Email,
    Message,
}

/// A regex applied to one field of the probe.
struct PatternRule {
    signal: Signal,
    field: Field,
    pattern: Regex,
}

impl PatternRule {
    fn new(signal: Signal, field: Field, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            signal,
            field,
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Rule for PatternRule {
    fn signal(&self) -> Signal {
        self.signal
    }

    fn matches(&self, probe: &Probe<'_>) -> bool {
        let haystack = match self.field {
            Field::UserAgent => match probe.user_agent {
                Some(ua) => ua,
                None => return false,
            },
            Field::Email => probe.email,
            Field::Message => probe.message,
        };
        self.pattern.is_match(haystack)
    }
}

/// Builds an alternation of literal words, e.g. `(?:a|b\.c)`.
fn alternation(words: &[String]) -> Option<String> {
    let escaped: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        None
    } else {
        Some(format!("(?:{})", escaped.join("|")))
    }
}

/// Ordered rule set used to flag likely spam or bot submissions.
pub struct SpamFilter {
    rules: Vec<Box<dyn Rule>>,
}

impl SpamFilter {
    /// Build the default rule chain from configuration.
    pub fn new(config: &FilterConfig) -> Result<Self, regex::Error> {
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(MissingUserAgent)];

        if let Some(agents) = alternation(&config.agent_signatures) {
            rules.push(Box::new(PatternRule::new(
                Signal::AutomationAgent,
                Field::UserAgent,
                &format!("(?i){agents}"),
            )?));
        }

        rules.push(Box::new(PatternRule::new(
            Signal::HtmlMarkup,
            Field::Message,
            r"<[^>]*>",
        )?));
        rules.push(Box::new(PatternRule::new(
            Signal::ForumMarkup,
            Field::Message,
            r"(?i)\[url=",
        )?));

        if let Some(keywords) = alternation(&config.blocked_keywords) {
            rules.push(Box::new(PatternRule::new(
                Signal::BlockedKeyword,
                Field::Message,
                &format!(r"(?i)\b{keywords}\b"),
            )?));
        }

        rules.push(Box::new(PatternRule::new(
            Signal::RawUrl,
            Field::Message,
            r"(?i)https?://",
        )?));

        if config.email_digit_run > 0 {
            rules.push(Box::new(PatternRule::new(
                Signal::DigitRun,
                Field::Email,
                &format!("[0-9]{{{},}}", config.email_digit_run),
            )?));
        }
        if config.email_token_len > 0 {
            rules.push(Box::new(PatternRule::new(
                Signal::RandomToken,
                Field::Email,
                &format!("[a-zA-Z0-9]{{{},}}", config.email_token_len),
            )?));
        }

        Ok(Self { rules })
    }

    /// Append a rule evaluated after the built-in ones.
    pub fn push_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Run the rules in order and stop at the first match.
    pub fn inspect(&self, probe: &Probe<'_>) -> Verdict {
        for rule in &self.rules {
            if rule.matches(probe) {
                debug!(signal = %rule.signal(), "Submission flagged");
                return Verdict::Suspicious(rule.signal());
            }
        }
        Verdict::Clean
    }

    pub fn is_suspicious(&self, user_agent: Option<&str>, email: &str, message: &str) -> bool {
        self.inspect(&Probe {
            user_agent,
            email,
            message,
        })
        .is_suspicious()
    }
}
