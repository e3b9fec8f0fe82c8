// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-memory mail transport that records every envelope.

use async_trait::async_trait;
use contact_relay::mailer::{DispatchError, Envelope, Mailer};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct RecordingMailer {
    sent: Mutex<Vec<Envelope>>,
    attempts: AtomicUsize,
    health_checks: AtomicUsize,
    fail_sends: AtomicBool,
    healthy: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            health_checks: AtomicUsize::new(0),
            fail_sends: AtomicBool::new(false),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Send attempts, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn health_checks(&self) -> usize {
        self.health_checks.load(Ordering::SeqCst)
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, envelope: &Envelope) -> Result<(), DispatchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(DispatchError::Rejected {
                status: 503,
                body: "upstream unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DispatchError> {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DispatchError::Unavailable("connection refused".to_string()))
        }
    }
}
