//! Live price series domain — per-tick samples for the subscribed symbol.

mod convert;
pub mod state;
pub mod wire;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{SeriesBuffer, SERIES_CAPACITY};

/// One price tick. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

impl PriceSample {
    pub fn new(timestamp: DateTime<Utc>, price: Decimal) -> Self {
        Self { timestamp, price }
    }
}
