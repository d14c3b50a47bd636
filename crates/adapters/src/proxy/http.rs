// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the document-store proxy

use super::wire::ErrorBody;
use super::{Action, DocumentProxy, ProxyError};
use async_trait::async_trait;
use std::time::Duration;

/// Blocking `ureq` client driven from tokio's blocking pool
#[derive(Clone)]
pub struct HttpDocumentProxy {
    agent: ureq::Agent,
    base_url: String,
    api_token: Option<String>,
}

impl HttpDocumentProxy {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an action
    pub fn url(&self, action: Action) -> String {
        format!("{}/action/{}", self.base_url, action.name())
    }

    fn call_blocking(
        &self,
        action: Action,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ProxyError> {
        let payload =
            serde_json::to_vec(body).map_err(|e| ProxyError::Encode(e.to_string()))?;

        let mut request = self
            .agent
            .post(self.url(action))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let mut response = request
            .send(&payload[..])
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ProxyError::Transport(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), status.canonical_reason(), &text));
        }

        serde_json::from_str(&text).map_err(|e| ProxyError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for HttpDocumentProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDocumentProxy")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl DocumentProxy for HttpDocumentProxy {
    async fn call(
        &self,
        action: Action,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ProxyError> {
        let proxy = self.clone();
        tokio::task::spawn_blocking(move || proxy.call_blocking(action, &body))
            .await
            .map_err(|e| ProxyError::Transport(format!("request task failed: {}", e)))?
    }
}

/// Error for a non-2xx response.
///
/// Prefers the server's `{"error": ...}` message, then the status reason
/// phrase.
pub(crate) fn status_error(status: u16, reason: Option<&str>, body: &str) -> ProxyError {
    let from_body = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty());
    let message = from_body
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| format!("request failed with status {}", status));
    ProxyError::Status { status, message }
}
