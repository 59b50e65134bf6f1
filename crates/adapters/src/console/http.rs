// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console sink backed by the control-plane REST API.
//!
//! Jobs post to `{api}/jobConsoles`, build jobs to `{api}/buildJobConsoles`.
//! Connection failures and 5xx responses are retried with exponential
//! backoff; any other non-2xx status fails the batch immediately.

use super::{ConsoleSink, SinkError};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use reqwest::Client;
use rp_core::console::batch_body;
use rp_core::{ConsoleEvent, ConsoleOwner};
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpConsoleSink {
    client: Client,
    base_url: Url,
    token: Option<String>,
    retry: RetryPolicy,
}

impl HttpConsoleSink {
    /// Create a sink for the API rooted at `base_url`.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, SinkError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| SinkError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SinkError::InvalidUrl(base_url.to_string()));
        }
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("reqproc/", env!("CARGO_PKG_VERSION")))
            .timeout(crate::env::api_request_timeout())
            .build()
            .map_err(|e| SinkError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: token.filter(|t| !t.is_empty()),
            retry: RetryPolicy::from_env(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full endpoint URL for an owner's console batches.
    pub fn endpoint(&self, owner: &ConsoleOwner) -> Result<Url, SinkError> {
        self.base_url
            .join(owner.route())
            .map_err(|e| SinkError::InvalidUrl(e.to_string()))
    }

    async fn send_once(&self, url: &Url, body: &Value) -> Result<(), SinkError> {
        let mut request = self.client.post(url.clone()).json(body);
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("apiToken {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SinkError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ConsoleSink for HttpConsoleSink {
    async fn post_batch(
        &self,
        owner: &ConsoleOwner,
        events: &[ConsoleEvent],
    ) -> Result<(), SinkError> {
        let url = self.endpoint(owner)?;
        let body = batch_body(owner, events);

        let mut failed = 0u32;
        loop {
            match self.send_once(&url, &body).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && self.retry.allows_retry(failed + 1) => {
                    let delay = self.retry.delay_for(failed);
                    tracing::warn!(
                        %url,
                        attempt = failed + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "console post failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    failed += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
