//! Low-level HTTP client — `StockHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens at the Layer 5 boundary). Internal to the SDK — Layer 5 wraps this.

use crate::auth::{CredentialProvider, LoginRequest, RegisterRequest, RegisterResponse, TokenResponse, UserProfile};
use crate::domain::news::wire::NewsArticleResponse;
use crate::domain::portfolio::wire::{PortfolioResponse, PortfolioValueResponse};
use crate::domain::stock::wire::{HistoryResponse, ListedSymbol, QuoteResponse, SearchResponse};
use crate::domain::trade::wire::{TradeHistoryResponse, TradeRequest, TrendingResponse};
use crate::domain::trade::TradeAction;
use crate::error::{detail_message, HttpError};
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::shared::{ApiMessage, Symbol};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Request timeout applied when the builder does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Low-level HTTP client for the StockStream REST API.
#[derive(Clone)]
pub struct StockHttp {
    base_url: String,
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
    /// Schedule behind [`RetryPolicy::Idempotent`].
    idempotent_retry: RetryConfig,
}

impl StockHttp {
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialProvider>) -> Result<Self, HttpError> {
        Self::with_timeout(base_url, credentials, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
            idempotent_retry: RetryConfig::idempotent(),
        })
    }

    /// Replace the schedule used for idempotent GETs.
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.idempotent_retry = config;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    // ── Users ────────────────────────────────────────────────────────────

    pub async fn register(&self, body: &RegisterRequest) -> Result<RegisterResponse, HttpError> {
        let url = format!("{}/users/register", self.base_url);
        self.post(&url, body, RetryPolicy::None).await
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<TokenResponse, HttpError> {
        let url = format!("{}/users/login", self.base_url);
        self.post(&url, body, RetryPolicy::None).await
    }

    pub async fn get_profile(&self) -> Result<UserProfile, HttpError> {
        let url = format!("{}/users/user/me", self.base_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Portfolio ────────────────────────────────────────────────────────

    pub async fn get_portfolio(&self) -> Result<PortfolioResponse, HttpError> {
        let url = format!("{}/portfolio/", self.base_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn update_portfolio(
        &self,
        symbol: &Symbol,
        quantity: u32,
    ) -> Result<ApiMessage, HttpError> {
        let url = format!(
            "{}/portfolio/update?symbol={}&quantity={}",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            quantity
        );
        self.request_with_retry(reqwest::Method::PUT, &url, None::<&()>, RetryPolicy::None)
            .await
    }

    pub async fn get_portfolio_value(&self) -> Result<PortfolioValueResponse, HttpError> {
        let url = format!("{}/portfolio/value", self.base_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Stocks ───────────────────────────────────────────────────────────

    pub async fn get_quote(&self, symbol: &Symbol) -> Result<QuoteResponse, HttpError> {
        let url = format!(
            "{}/stocks/{}",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        );
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn get_history(&self, symbol: &Symbol) -> Result<HistoryResponse, HttpError> {
        let url = format!(
            "{}/stocks/get/history?symbol={}",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        );
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn search_stocks(&self, query: &str) -> Result<SearchResponse, HttpError> {
        let url = format!(
            "{}/stocks/get/search?query={}",
            self.base_url,
            urlencoding::encode(query)
        );
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn get_symbols(&self, exchange: Option<&str>) -> Result<Vec<ListedSymbol>, HttpError> {
        let mut url = format!("{}/stocks/get/symbols", self.base_url);
        if let Some(e) = exchange {
            url = format!("{}?exchange={}", url, urlencoding::encode(e));
        }
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Trading ──────────────────────────────────────────────────────────

    pub async fn trade(
        &self,
        action: TradeAction,
        request: &TradeRequest,
    ) -> Result<ApiMessage, HttpError> {
        let url = format!("{}/trading/trade?action={}", self.base_url, action.as_str());
        self.post(&url, request, RetryPolicy::None).await
    }

    pub async fn get_trade_history(&self) -> Result<TradeHistoryResponse, HttpError> {
        let url = format!("{}/trading/trade/history", self.base_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn get_trending(&self) -> Result<TrendingResponse, HttpError> {
        let url = format!("{}/trading/trending", self.base_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    /// `symbols` is a comma-separated list.
    pub async fn get_news(&self, symbols: &str) -> Result<Vec<NewsArticleResponse>, HttpError> {
        let url = format!(
            "{}/trading/api/news?symbols={}",
            self.base_url,
            urlencoding::encode(symbols)
        );
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str, retry: RetryPolicy) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::GET, url, None::<&()>, retry)
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::POST, url, Some(body), retry)
            .await
    }

    async fn request_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match retry {
            RetryPolicy::Idempotent => Some(self.idempotent_retry.clone()),
            other => other.config(),
        };
        let Some(config) = config else {
            return self.do_request(&method, url, body).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T, B>(&method, url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => config.is_retryable_status(*status),
                        HttpError::RateLimited { .. } => config.is_retryable_status(429),
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => re.is_connect() || re.is_timeout() || re.is_request(),
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = match &e {
                            HttpError::RateLimited {
                                retry_after_ms: Some(ms),
                            } => config.delay_with_retry_after(attempt, *ms),
                            _ => config.delay_for_attempt(attempt),
                        };
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else if should_retry {
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<T, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        if let Some(token) = self.credentials.get() {
            req = req.bearer_auth(token);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(e)
            }
        })?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let body_text = resp.text().await.unwrap_or_default();
        let detail = detail_message(&body_text);

        tracing::debug!(status = status_code, "{} {} failed: {}", method, url, detail);

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(detail)),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(detail)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: detail,
            }),
        }
    }
}
