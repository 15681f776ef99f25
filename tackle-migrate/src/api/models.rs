//! Connection models shared by auth and the HTTP client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Username/password pair used for the resource-owner password grant
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialSet {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSet")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// One Tackle instance the migration talks to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    /// "source" or "destination"
    pub name: String,
    /// Base url without trailing slash
    pub url: String,
    /// Keycloak realm
    pub realm: String,
    /// OAuth2 client id
    pub client_id: String,
    /// Accept invalid TLS certificates
    pub insecure: bool,
    pub credentials: CredentialSet,
}

impl Environment {
    /// Token endpoint for this environment's realm
    pub fn token_url(&self) -> String {
        format!(
            "{}/auth/realms/{}/protocol/openid-connect/token",
            self.url, self.realm
        )
    }
}

/// Bearer token acquired for one run
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenInfo {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl std::fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenInfo")
            .field("access_token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url() {
        let env = Environment {
            name: "source".to_string(),
            url: "https://tackle.example.com".to_string(),
            realm: "tackle".to_string(),
            client_id: "tackle-ui".to_string(),
            insecure: false,
            credentials: CredentialSet {
                username: "admin".to_string(),
                password: "secret".to_string(),
            },
        };
        assert_eq!(
            env.token_url(),
            "https://tackle.example.com/auth/realms/tackle/protocol/openid-connect/token"
        );
        assert!(!format!("{:?}", env).contains("secret"));
    }

    #[test]
    fn test_token_expiry() {
        let token = TokenInfo {
            access_token: "abc".to_string(),
            expires_at: Utc::now() - chrono::Duration::seconds(1),
        };
        assert!(token.is_expired());
        assert!(!format!("{:?}", token).contains("abc"));

        let token = TokenInfo {
            expires_at: Utc::now() + chrono::Duration::minutes(5),
            ..token
        };
        assert!(!token.is_expired());
    }
}
