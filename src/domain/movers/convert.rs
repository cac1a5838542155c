//! Conversions from wire types to domain types for market movers.

use super::wire::WsMarketMover;
use super::{Direction, MoverSnapshot};

impl From<WsMarketMover> for MoverSnapshot {
    fn from(m: WsMarketMover) -> Self {
        let direction = match m.is_up {
            Some(is_up) => Direction::from_is_up(is_up),
            None => Direction::from_change(m.change),
        };
        Self {
            symbol: m.symbol,
            display_name: m.name,
            price: m.price,
            change_percent: m.change,
            direction,
        }
    }
}
