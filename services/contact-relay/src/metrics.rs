// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the contact relay.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

/// Counters and timings owned by one service instance.
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    dispatch_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new(
                "contact_submissions_total",
                "Contact submissions by terminal outcome",
            ),
            &["outcome"],
        )?;
        let dispatch_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "contact_dispatch_seconds",
                "Time spent handing messages to the mail provider",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0]),
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(dispatch_seconds.clone()))?;

        Ok(Self {
            registry,
            submissions,
            dispatch_seconds,
        })
    }

    /// Count one submission that ended in `outcome`.
    pub fn record_outcome(&self, outcome: &str) {
        self.submissions.with_label_values(&[outcome]).inc();
    }

    pub fn observe_dispatch(&self, seconds: f64) {
        self.dispatch_seconds.observe(seconds);
    }

    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.submissions.with_label_values(&[outcome]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
