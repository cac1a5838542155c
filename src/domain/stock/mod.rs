//! Stock domain — quotes, daily close history, symbol search.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use wire::{ListedSymbol, SearchResult};

/// Real-time quote for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub current: Decimal,
    /// Absolute change vs previous close; `None` when the upstream feed has none.
    pub change: Option<Decimal>,
    pub change_percent: Option<Decimal>,
    pub high: Decimal,
    pub low: Decimal,
    pub open: Decimal,
    pub previous_close: Decimal,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Quote {
    /// The quote provider answers unknown symbols with an all-zero quote
    /// instead of an error.
    pub fn is_empty(&self) -> bool {
        self.current.is_zero() && self.previous_close.is_zero()
    }
}

/// One daily close of the history chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}
