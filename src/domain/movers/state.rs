//! Movers state container.

use super::MoverSnapshot;
use crate::shared::Symbol;

/// Holds exactly the latest movers snapshot pushed by the server.
///
/// `replace` overwrites unconditionally; there is no merge with the previous
/// set and server order is preserved.
#[derive(Debug, Clone, Default)]
pub struct MoversTable {
    movers: Vec<MoverSnapshot>,
}

impl MoversTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, snapshot: Vec<MoverSnapshot>) -> &[MoverSnapshot] {
        self.movers = snapshot;
        &self.movers
    }

    pub fn movers(&self) -> &[MoverSnapshot] {
        &self.movers
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&MoverSnapshot> {
        self.movers.iter().find(|m| &m.symbol == symbol)
    }

    pub fn clear(&mut self) {
        self.movers.clear();
    }

    pub fn len(&self) -> usize {
        self.movers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::movers::Direction;
    use rust_decimal::Decimal;

    fn mover(symbol: &str, change: i64) -> MoverSnapshot {
        MoverSnapshot {
            symbol: Symbol::from(symbol),
            display_name: format!("{} Inc.", symbol),
            price: Decimal::from(100),
            change_percent: Decimal::from(change),
            direction: Direction::from_change(Decimal::from(change)),
        }
    }

    #[test]
    fn test_replace_is_not_a_merge() {
        let mut table = MoversTable::new();
        table.replace(vec![
            mover("AAPL", 1),
            mover("MSFT", -2),
            mover("TSLA", 5),
            mover("META", -1),
        ]);
        assert_eq!(table.len(), 4);

        let held = table.replace(vec![mover("NVDA", 3), mover("AMZN", -4)]);
        let symbols: Vec<_> = held.iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(symbols, ["NVDA", "AMZN"]);
        assert!(table.get(&Symbol::from("AAPL")).is_none());
    }

    #[test]
    fn test_get_and_clear() {
        let mut table = MoversTable::new();
        table.replace(vec![mover("TSLA", -3)]);
        assert_eq!(
            table.get(&Symbol::from("TSLA")).map(|m| m.direction),
            Some(Direction::Down)
        );
        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn test_replace_with_empty_snapshot() {
        let mut table = MoversTable::new();
        table.replace(vec![mover("AAPL", 1)]);
        table.replace(Vec::new());
        assert!(table.is_empty());
    }
}
