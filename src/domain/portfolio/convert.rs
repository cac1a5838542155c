//! Conversions from wire types to domain types for the portfolio.

use super::wire::{HoldingResponse, HoldingValueResponse, PortfolioValueResponse};
use super::{Holding, HoldingValue, PortfolioValue};

impl From<HoldingResponse> for Holding {
    fn from(h: HoldingResponse) -> Self {
        Self {
            symbol: h.symbol,
            quantity: h.quantity,
            logo: h.logo.filter(|l| !l.is_empty()),
        }
    }
}

impl From<HoldingValueResponse> for HoldingValue {
    fn from(h: HoldingValueResponse) -> Self {
        Self {
            symbol: h.symbol,
            quantity: h.quantity,
            price: h.price,
            total_value: h.total_value,
            logo: h.logo.filter(|l| !l.is_empty()),
        }
    }
}

impl From<PortfolioValueResponse> for PortfolioValue {
    fn from(v: PortfolioValueResponse) -> Self {
        Self {
            total: v.total_portfolio_value,
            holdings: v.stocks.into_iter().map(HoldingValue::from).collect(),
        }
    }
}
