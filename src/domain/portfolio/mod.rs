//! Portfolio domain — holdings, server valuation, client-side P/L.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod valuation;
pub mod wire;

use crate::shared::Symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use valuation::{aggregate_holdings, summarize, value_holding};

/// A position as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub logo: Option<String>,
}

/// A holding priced by the server (`GET /portfolio/value`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoldingValue {
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total_value: Decimal,
    pub logo: Option<String>,
}

/// Server-side portfolio valuation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioValue {
    pub total: Decimal,
    pub holdings: Vec<HoldingValue>,
}

/// A holding priced client-side against its live quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoldingValuation {
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub logo: Option<String>,
    pub current_price: Decimal,
    pub previous_close: Decimal,
    pub total_value: Decimal,
    /// Day P/L: `(current - previous_close) * quantity`.
    pub profit_loss: Decimal,
    pub profit_loss_pct: Decimal,
    /// `false` when the quote could not be fetched and the row is zeroed.
    pub priced: bool,
}

/// Totals across all valued holdings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    /// Σ previous_close × quantity.
    pub total_investment: Decimal,
    pub total_value: Decimal,
    pub total_profit_loss: Decimal,
    pub total_profit_loss_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioValuation {
    pub holdings: Vec<HoldingValuation>,
    pub summary: PortfolioSummary,
}
