//! Market movers domain — the server's periodic top-movers snapshot.

mod convert;
pub mod state;
pub mod wire;

use crate::shared::Symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::MoversTable;

/// Price direction of a mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn from_is_up(is_up: bool) -> Self {
        if is_up {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Direction implied by a signed change (zero counts as up).
    pub fn from_change(change: Decimal) -> Self {
        if change.is_sign_negative() && !change.is_zero() {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Direction::Up)
    }
}

/// One row of the market-movers table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoverSnapshot {
    pub symbol: Symbol,
    pub display_name: String,
    pub price: Decimal,
    pub change_percent: Decimal,
    pub direction: Direction,
}
