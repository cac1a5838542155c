//! High-level client — `StockClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the credential provider, and accessor methods.

use crate::auth::client::Auth;
use crate::auth::{CredentialProvider, MemoryCredentials};
use crate::domain::news::client::News;
use crate::domain::portfolio::client::Portfolio;
use crate::domain::stock::client::Stocks;
use crate::domain::trade::client::Trading;
use crate::error::{AuthError, SdkError};
use crate::http::client::DEFAULT_TIMEOUT;
use crate::http::{RetryConfig, StockHttp};
use crate::network::{API_URL_ENV, DEFAULT_API_URL, DEFAULT_WS_URL, WS_URL_ENV};
use crate::ws::WsConfig;

use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::news::client::News as NewsClient;
pub use crate::domain::portfolio::client::Portfolio as PortfolioClient;
pub use crate::domain::stock::client::Stocks as StocksClient;
pub use crate::domain::trade::client::Trading as TradingClient;

/// The primary entry point for the SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.portfolio()`, `client.trading()`, etc.
#[derive(Clone)]
pub struct StockClient {
    pub(crate) http: StockHttp,
    pub(crate) ws_config: WsConfig,
}

impl StockClient {
    pub fn builder() -> StockClientBuilder {
        StockClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn portfolio(&self) -> Portfolio<'_> {
        Portfolio { client: self }
    }

    pub fn stocks(&self) -> Stocks<'_> {
        Stocks { client: self }
    }

    pub fn trading(&self) -> Trading<'_> {
        Trading { client: self }
    }

    pub fn news(&self) -> News<'_> {
        News { client: self }
    }

    /// Get a WS config for creating a stream connection.
    ///
    /// The stream is not embedded in `StockClient`: its lifetime belongs to
    /// whatever view is showing live prices.
    pub fn ws_config(&self) -> &WsConfig {
        &self.ws_config
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        self.http.credentials()
    }

    /// Fail fast when an authenticated endpoint is called without a token.
    pub(crate) fn require_auth(&self) -> Result<(), SdkError> {
        if self.credentials().is_authenticated() {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated.into())
        }
    }

    /// Create an unopened stream connection from the current config.
    #[cfg(feature = "ws-native")]
    pub fn stream(&self) -> crate::ws::native::StreamConnection {
        crate::ws::native::StreamConnection::new(self.ws_config.clone())
    }

    /// Open a stream and mount a live dashboard on `symbol`.
    #[cfg(feature = "ws-native")]
    pub async fn dashboard(
        &self,
        symbol: crate::shared::Symbol,
    ) -> Result<crate::dashboard::LiveDashboard<crate::ws::native::StreamConnection>, SdkError>
    {
        Ok(crate::dashboard::LiveDashboard::mount(self.ws_config.clone(), symbol).await?)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct StockClientBuilder {
    base_url: String,
    ws_url: String,
    credentials: Option<Arc<dyn CredentialProvider>>,
    timeout: Duration,
    retry: RetryConfig,
}

impl Default for StockClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::idempotent(),
        }
    }
}

impl StockClientBuilder {
    /// Defaults, overridden by `STOCK_API_URL` / `STOCK_WS_URL` when set.
    pub fn from_env() -> Self {
        let mut builder = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                builder.base_url = url.trim().to_string();
            }
        }
        if let Ok(url) = std::env::var(WS_URL_ENV) {
            if !url.trim().is_empty() {
                builder.ws_url = url.trim().to_string();
            }
        }
        builder
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn ws_url(mut self, url: &str) -> Self {
        self.ws_url = url.to_string();
        self
    }

    /// Token store shared by every REST call. Defaults to [`MemoryCredentials`].
    pub fn credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Backoff schedule for read-only calls. Writes are never retried.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    pub fn build(self) -> Result<StockClient, SdkError> {
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(MemoryCredentials::new()));
        Ok(StockClient {
            http: StockHttp::with_timeout(&self.base_url, credentials, self.timeout)?
                .with_retry(self.retry),
            ws_config: WsConfig::new(self.ws_url),
        })
    }
}
