//! Wire types for `stock_update` frames.

use crate::shared::serde_util::{decimal_number, flexible_timestamp};
use crate::shared::Symbol;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// `data` payload of a `stock_update` frame.
///
/// `symbol` is optional: older servers send only `{price, time}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StockUpdate {
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub price: Decimal,
    #[serde(deserialize_with = "flexible_timestamp::deserialize")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub symbol: Option<Symbol>,
}
