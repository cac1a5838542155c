//! Conversions from wire types to domain types for price ticks.

use super::wire::StockUpdate;
use super::PriceSample;

impl From<StockUpdate> for PriceSample {
    fn from(u: StockUpdate) -> Self {
        Self {
            timestamp: u.time,
            price: u.price,
        }
    }
}

impl From<&StockUpdate> for PriceSample {
    fn from(u: &StockUpdate) -> Self {
        Self {
            timestamp: u.time,
            price: u.price,
        }
    }
}
