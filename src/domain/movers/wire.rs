//! Wire types for `market_movers` frames.

use crate::shared::serde_util::decimal_number;
use crate::shared::Symbol;
use rust_decimal::Decimal;
use serde::Deserialize;

/// One entry of a `market_movers` frame's `data` array.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WsMarketMover {
    pub symbol: Symbol,
    pub name: String,
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub price: Decimal,
    /// Percent change.
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub change: Decimal,
    #[serde(rename = "isUp", default)]
    pub is_up: Option<bool>,
}
