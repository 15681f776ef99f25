//! HTTP client for a Tackle instance

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, trace};
use reqwest::Method;
use serde_json::Value;

use super::models::{Environment, TokenInfo};
use super::operations::{Operation, OperationResult};
use super::transport::Transport;

/// Authenticated client bound to one Tackle instance
///
/// Requests are issued one at a time by the caller; the client keeps no
/// state between calls besides the bearer token.
pub struct TackleClient {
    http: reqwest::Client,
    base_url: String,
    label: String,
    token: TokenInfo,
}

impl TackleClient {
    pub fn new(env: &Environment, token: TokenInfo) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(env.insecure)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: env.url.trim_end_matches('/').to_string(),
            label: env.name.clone(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for TackleClient {
    fn label(&self) -> &str {
        &self.label
    }

    async fn execute(&self, operation: &Operation) -> Result<OperationResult> {
        let url = self.url(operation.path());
        let method = match operation.http_method() {
            "POST" => Method::POST,
            "DELETE" => Method::DELETE,
            _ => Method::GET,
        };

        debug!("{} {}: {} {}", self.label, operation.operation_type(), method, url);

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&self.token.access_token)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = operation.body() {
            trace!("Request body: {}", body);
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send {} {}", operation.http_method(), url))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {}", url))?;

        if !(200..300).contains(&status) {
            debug!("{} {} returned HTTP {}", self.label, url, status);
            let message = if status == 401 && self.token.is_expired() {
                format!(
                    "{} (token expired at {})",
                    text,
                    self.token.expires_at.format("%H:%M:%S UTC")
                )
            } else {
                text
            };
            return Ok(OperationResult::error(operation.clone(), message, Some(status)));
        }

        let data = if text.trim().is_empty() {
            None
        } else {
            let value: Value = serde_json::from_str(&text)
                .with_context(|| format!("Response from {} is not valid JSON", url))?;
            Some(value)
        };

        Ok(OperationResult::success(operation.clone(), data, status))
    }
}
