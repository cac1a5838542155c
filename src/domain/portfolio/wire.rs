//! Wire types for `/portfolio` responses.

use crate::shared::serde_util::decimal_number;
use crate::shared::Symbol;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HoldingResponse {
    pub symbol: Symbol,
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub quantity: Decimal,
    #[serde(default)]
    pub logo: Option<String>,
}

/// `GET /portfolio/`
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioResponse {
    #[serde(default)]
    pub portfolio: Vec<HoldingResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoldingValueResponse {
    pub symbol: Symbol,
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub quantity: Decimal,
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub price: Decimal,
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub total_value: Decimal,
    #[serde(default)]
    pub logo: Option<String>,
}

/// `GET /portfolio/value`
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioValueResponse {
    #[serde(deserialize_with = "decimal_number::deserialize")]
    pub total_portfolio_value: Decimal,
    #[serde(default)]
    pub stocks: Vec<HoldingValueResponse>,
}
