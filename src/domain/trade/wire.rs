//! Wire types for `/trading` requests and responses.

use crate::shared::serde_util::decimal_number;
use crate::shared::Symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /trading/trade?action=...`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeRequest {
    pub symbol: Symbol,
    pub quantity: u32,
}

/// Raw history entry. `action` and `timestamp` are validated on conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRecordResponse {
    pub action: String,
    pub symbol: Symbol,
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub quantity: Decimal,
    pub timestamp: serde_json::Value,
}

/// `GET /trading/trade/history`
#[derive(Debug, Clone, Deserialize)]
pub struct TradeHistoryResponse {
    #[serde(default)]
    pub trade_history: Vec<TradeRecordResponse>,
}

/// `GET /trading/trending`
#[derive(Debug, Clone, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub trending_stocks: Vec<Symbol>,
}
