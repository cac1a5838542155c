//! Authentication — credential providers, login/register/profile types.
//!
//! ## Token Model
//!
//! The backend issues a bearer token from `POST /users/login`. The SDK never
//! keeps it in a global: every REST-calling component reads it on demand from
//! one [`CredentialProvider`] that the application constructs once and hands
//! to `StockClient`.
//!
//! - [`MemoryCredentials`]: process-lifetime only.
//! - [`FileCredentials`]: persisted to disk with an in-memory mirror, so a
//!   restarted process picks the session back up.
//!
//! The token is written on login, read on every authenticated call, and
//! cleared on logout or when the profile endpoint answers 401.

#[cfg(feature = "http")]
pub mod client;

pub mod store;

use crate::error::AuthError;
use crate::shared::serde_util::option_decimal_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

pub use store::FileCredentials;

// ============================================================================
// Credential provider
// ============================================================================

/// Source of the bearer token for REST calls.
pub trait CredentialProvider: Send + Sync {
    /// Current token, `None` when unauthenticated.
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<(), AuthError>;

    fn clear(&self) -> Result<(), AuthError>;

    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

/// In-process token holder.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialProvider for MemoryCredentials {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, token: &str) -> Result<(), AuthError> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Profile returned by `GET /users/user/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "option_decimal_number::deserialize")]
    pub balance: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_credentials_lifecycle() {
        let creds = MemoryCredentials::new();
        assert!(!creds.is_authenticated());

        creds.set("tok_1").unwrap();
        assert_eq!(creds.get().as_deref(), Some("tok_1"));

        creds.clear().unwrap();
        assert_eq!(creds.get(), None);
    }

    #[test]
    fn test_provider_is_object_safe() {
        let provider: std::sync::Arc<dyn CredentialProvider> =
            std::sync::Arc::new(MemoryCredentials::with_token("abc"));
        assert!(provider.is_authenticated());
    }

    #[test]
    fn test_user_profile_deserialize() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"_id":"65f0c1","username":"ada","email":"ada@example.com","portfolio":[],"trade_history":[]}"#,
        )
        .unwrap();
        assert_eq!(profile.id, "65f0c1");
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.balance, None);
    }

    #[test]
    fn test_token_response_default_type() {
        let resp: TokenResponse = serde_json::from_str(r#"{"access_token":"jwt"}"#).unwrap();
        assert_eq!(resp.token_type, "bearer");
    }
}
