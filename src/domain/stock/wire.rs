//! Wire types for `/stocks` responses.

use crate::shared::serde_util::{decimal_number, option_decimal_number};
use crate::shared::Symbol;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `GET /stocks/{symbol}` — upstream quote passed through verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteResponse {
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub c: Decimal,
    #[serde(default, deserialize_with = "option_decimal_number::deserialize")]
    pub d: Option<Decimal>,
    #[serde(default, deserialize_with = "option_decimal_number::deserialize")]
    pub dp: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_number::deserialize")]
    pub h: Decimal,
    #[serde(default, deserialize_with = "decimal_number::deserialize")]
    pub l: Decimal,
    #[serde(default, deserialize_with = "decimal_number::deserialize")]
    pub o: Decimal,
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub pc: Decimal,
    /// Epoch seconds.
    #[serde(default)]
    pub t: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPointResponse {
    pub date: NaiveDate,
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub close: Decimal,
}

/// `GET /stocks/get/history`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub data: Vec<HistoryPointResponse>,
}

/// One equity hit from `GET /stocks/get/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub symbol: Symbol,
    pub name: String,
    pub exchange: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// One entry of `GET /stocks/get/symbols`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListedSymbol {
    pub symbol: Symbol,
    pub exchange: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}
