//! HTTP client layer — `StockHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::StockHttp;
pub use retry::{RetryConfig, RetryPolicy};
