//! Network URL constants for the StockStream SDK.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://stock-project-1.onrender.com";

/// Default market-data WebSocket URL.
pub const DEFAULT_WS_URL: &str = "wss://stock-project-1.onrender.com/ws";

/// Environment variable overriding [`DEFAULT_API_URL`] in `StockClientBuilder::from_env`.
pub const API_URL_ENV: &str = "STOCK_API_URL";

/// Environment variable overriding [`DEFAULT_WS_URL`] in `StockClientBuilder::from_env`.
pub const WS_URL_ENV: &str = "STOCK_WS_URL";
