//! Tackle REST API Module
//!
//! Authenticated request/response primitives shared by the source (Tackle 1)
//! and destination (Tackle 2 hub) sides of a migration.

pub mod auth;
pub mod client;
pub mod models;
pub mod operations;
pub mod transport;

#[cfg(test)]
pub mod fake;

pub use auth::AuthManager;
pub use client::TackleClient;
pub use models::{CredentialSet, Environment};
pub use operations::Operation;
pub use transport::Transport;

/// Authenticate against `env` and return a ready client
pub async fn connect(env: &Environment) -> anyhow::Result<TackleClient> {
    let token = AuthManager::new(env.insecure)?.acquire_token(env).await?;
    TackleClient::new(env, token)
}
