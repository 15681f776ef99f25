//! Token acquisition against the Keycloak realm fronting a Tackle instance

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use log::{debug, info};
use serde::Deserialize;

use super::models::{Environment, TokenInfo};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Performs the resource-owner password credential exchange
pub struct AuthManager {
    http: reqwest::Client,
}

impl AuthManager {
    pub fn new(insecure: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("Failed to build HTTP client for authentication")?;
        Ok(Self { http })
    }

    /// Acquire a bearer token for `env`. Called once per run and system.
    pub async fn acquire_token(&self, env: &Environment) -> Result<TokenInfo> {
        let url = env.token_url();
        debug!("Requesting {} token from {}", env.name, url);

        let form = [
            ("grant_type", "password"),
            ("client_id", env.client_id.as_str()),
            ("username", env.credentials.username.as_str()),
            ("password", env.credentials.password.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .with_context(|| format!("Failed to reach token endpoint for {}", env.name))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Authentication against {} ({}) failed with HTTP {}: {}",
                env.name,
                url,
                status.as_u16(),
                body
            );
        }

        let token: TokenResponse = response
            .json()
            .await
            .with_context(|| format!("Invalid token response from {}", env.name))?;

        let expires_at = Utc::now() + Duration::seconds(token.expires_in.unwrap_or(300));
        info!(
            "Authenticated to {} as {} (token valid until {})",
            env.name,
            env.credentials.username,
            expires_at.format("%H:%M:%S UTC")
        );

        Ok(TokenInfo {
            access_token: token.access_token,
            expires_at,
        })
    }
}
