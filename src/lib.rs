//! # StockStream SDK
//!
//! A Rust SDK for the StockStream paper-trading dashboard: live price
//! streaming over WebSocket plus the portfolio / trading REST API.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Symbols, domain models, rolling series and movers state (always available)
//! 2. **Auth** — Injectable credential providers, login/register types
//! 3. **HTTP API** — `StockHttp` with per-endpoint retry policies
//! 4. **WebSocket** — Frame parsing, subscription control, `tokio-tungstenite` connection
//! 5. **High-Level** — `StockClient` with nested sub-clients; `LiveDashboard` view state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockstream_sdk::prelude::*;
//!
//! let client = StockClient::builder().build()?;
//! client.auth().login("me@example.com", "secret").await?;
//! let valuation = client.portfolio().valuation().await?;
//!
//! let mut dashboard = client.dashboard(Symbol::from("AAPL")).await?;
//! while let Some(update) = dashboard.next_update().await {
//!     println!("{:?} {:?}", update, dashboard.latest_price());
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and serde helpers used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: credential providers, login/logout.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: WebSocket ───────────────────────────────────────────────────────

/// WebSocket streaming: frames, events, subscriptions, connection.
pub mod ws;

// ── Layer 5: High-Level ──────────────────────────────────────────────────────

/// `LiveDashboard` — the consumer that owns a stream and its state.
pub mod dashboard;

/// `StockClient` — the REST entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{ApiMessage, Symbol, DEFAULT_SYMBOL, SUPPORTED_SYMBOLS};

    // Domain types — streaming
    pub use crate::domain::movers::{Direction, MoverSnapshot, MoversTable};
    pub use crate::domain::series::{PriceSample, SeriesBuffer, SERIES_CAPACITY};

    // Domain types — REST
    pub use crate::domain::news::NewsArticle;
    pub use crate::domain::portfolio::{
        Holding, HoldingValuation, HoldingValue, PortfolioSummary, PortfolioValuation,
        PortfolioValue,
    };
    pub use crate::domain::stock::{ClosePoint, ListedSymbol, Quote, SearchResult};
    pub use crate::domain::trade::{TradeAction, TradeRecord};

    // Errors
    pub use crate::error::{AuthError, HttpError, SdkError, WsError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_WS_URL};

    // Auth
    pub use crate::auth::{CredentialProvider, FileCredentials, MemoryCredentials, UserProfile};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AuthClient, NewsClient, PortfolioClient, StockClient, StockClientBuilder, StocksClient,
        TradingClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // WebSocket types
    pub use crate::ws::{
        parse_frame, ConnectionState, Kind, SubscriptionController, SubscriptionSink,
        SubscriptionState, WsConfig, WsEvent,
    };
    #[cfg(feature = "ws-native")]
    pub use crate::ws::native::StreamConnection;

    // View state
    pub use crate::dashboard::{DashboardUpdate, LiveDashboard};
}
