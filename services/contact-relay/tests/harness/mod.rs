// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for the contact relay.
//!
//! Builds the real router around a recording mailer and drives it with
//! in-process requests.

#![allow(dead_code)]

pub mod attacks;
pub mod generators;
pub mod mailer;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use contact_relay::{
    config::Config,
    gatekeeper::Gatekeeper,
    handlers::{router, AppState},
    mailer::MailRelay,
    metrics::Metrics,
};
use mailer::RecordingMailer;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// A browser user agent the filter accepts.
pub const BROWSER: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0";

/// Router plus handles on the collaborators behind it.
pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    pub state: Arc<AppState>,
}

/// Reply from the relay.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl TestApp {
    pub fn new(config: Config) -> Self {
        let mailer = Arc::new(RecordingMailer::new());
        let metrics = Arc::new(Metrics::new().unwrap());
        let relay = MailRelay::new(mailer.clone(), Duration::from_secs(5));
        let gatekeeper = Gatekeeper::new(&config, relay, metrics.clone()).unwrap();
        let state = Arc::new(AppState {
            gatekeeper,
            metrics,
            config,
        });

        Self {
            router: router(state.clone()),
            mailer,
            state,
        }
    }

    /// Submit a JSON body from `ip` with an optional user agent.
    pub async fn submit(
        &self,
        ip: &str,
        user_agent: Option<&str>,
        body: &serde_json::Value,
    ) -> Reply {
        self.submit_raw(ip, user_agent, body.to_string().into_bytes())
            .await
    }

    pub async fn submit_raw(&self, ip: &str, user_agent: Option<&str>, body: Vec<u8>) -> Reply {
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header("content-type", "application/json")
            .header("x-forwarded-for", ip);
        if let Some(ua) = user_agent {
            request = request.header("user-agent", ua);
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        read_reply(response).await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

async fn read_reply(response: axum::response::Response) -> Reply {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    Reply {
        status,
        headers,
        body,
    }
}
