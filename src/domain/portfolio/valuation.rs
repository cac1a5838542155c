//! Client-side portfolio valuation against live quotes.

use super::{Holding, HoldingValuation, PortfolioSummary};
use crate::domain::stock::Quote;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Merge duplicate holdings of the same symbol, summing quantities.
///
/// Output keeps first-seen order; the first non-empty logo wins.
pub fn aggregate_holdings(holdings: Vec<Holding>) -> Vec<Holding> {
    let mut index = HashMap::new();
    let mut merged: Vec<Holding> = Vec::with_capacity(holdings.len());

    for holding in holdings {
        match index.get(&holding.symbol) {
            Some(&i) => {
                let existing: &mut Holding = &mut merged[i];
                existing.quantity = existing.quantity.saturating_add(holding.quantity);
                if existing.logo.is_none() {
                    existing.logo = holding.logo;
                }
            }
            None => {
                index.insert(holding.symbol.clone(), merged.len());
                merged.push(holding);
            }
        }
    }

    merged
}

/// Price one holding. A missing quote, or one whose figures overflow,
/// yields a zeroed, unpriced row.
pub fn value_holding(holding: &Holding, quote: Option<&Quote>) -> HoldingValuation {
    let Some(quote) = quote else {
        return unpriced(holding);
    };

    price(holding, quote).unwrap_or_else(|| {
        tracing::warn!("Valuation of {} overflowed, leaving it unpriced", holding.symbol);
        unpriced(holding)
    })
}

fn price(holding: &Holding, quote: &Quote) -> Option<HoldingValuation> {
    let change = quote.current.checked_sub(quote.previous_close)?;
    let profit_loss_pct = if quote.previous_close.is_zero() {
        Decimal::ZERO
    } else {
        change
            .checked_div(quote.previous_close)?
            .checked_mul(Decimal::ONE_HUNDRED)?
    };

    Some(HoldingValuation {
        symbol: holding.symbol.clone(),
        quantity: holding.quantity,
        logo: holding.logo.clone(),
        current_price: quote.current,
        previous_close: quote.previous_close,
        total_value: quote.current.checked_mul(holding.quantity)?,
        profit_loss: change.checked_mul(holding.quantity)?,
        profit_loss_pct,
        priced: true,
    })
}

fn unpriced(holding: &Holding) -> HoldingValuation {
    HoldingValuation {
        symbol: holding.symbol.clone(),
        quantity: holding.quantity,
        logo: holding.logo.clone(),
        current_price: Decimal::ZERO,
        previous_close: Decimal::ZERO,
        total_value: Decimal::ZERO,
        profit_loss: Decimal::ZERO,
        profit_loss_pct: Decimal::ZERO,
        priced: false,
    }
}

/// Portfolio totals. The percentage is zero when nothing was invested.
///
/// Totals saturate at the `Decimal` range instead of overflowing.
pub fn summarize(rows: &[HoldingValuation]) -> PortfolioSummary {
    let mut summary = PortfolioSummary::default();
    for row in rows {
        summary.total_investment = summary
            .total_investment
            .saturating_add(row.previous_close.saturating_mul(row.quantity));
        summary.total_value = summary.total_value.saturating_add(row.total_value);
        summary.total_profit_loss = summary.total_profit_loss.saturating_add(row.profit_loss);
    }
    if summary.total_investment > Decimal::ZERO {
        summary.total_profit_loss_pct = summary
            .total_profit_loss
            .checked_div(summary.total_investment)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or_default();
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Symbol;
    use std::str::FromStr;

    fn holding(symbol: &str, qty: i64) -> Holding {
        Holding {
            symbol: Symbol::from(symbol),
            quantity: Decimal::from(qty),
            logo: None,
        }
    }

    fn quote(current: &str, previous_close: &str) -> Quote {
        Quote {
            current: Decimal::from_str(current).unwrap(),
            change: None,
            change_percent: None,
            high: Decimal::ZERO,
            low: Decimal::ZERO,
            open: Decimal::ZERO,
            previous_close: Decimal::from_str(previous_close).unwrap(),
            timestamp: None,
        }
    }

    #[test]
    fn test_aggregate_sums_duplicates_in_order() {
        let mut second_aapl = holding("AAPL", 2);
        second_aapl.logo = Some("aapl.png".into());
        let merged = aggregate_holdings(vec![
            holding("AAPL", 3),
            holding("TSLA", 1),
            second_aapl,
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].symbol.as_str(), "AAPL");
        assert_eq!(merged[0].quantity, Decimal::from(5));
        assert_eq!(merged[0].logo.as_deref(), Some("aapl.png"));
        assert_eq!(merged[1].symbol.as_str(), "TSLA");
    }

    #[test]
    fn test_value_holding_with_quote() {
        let row = value_holding(&holding("AAPL", 4), Some(&quote("110", "100")));
        assert!(row.priced);
        assert_eq!(row.total_value, Decimal::from(440));
        assert_eq!(row.profit_loss, Decimal::from(40));
        assert_eq!(row.profit_loss_pct, Decimal::from(10));
    }

    #[test]
    fn test_value_holding_without_quote_is_zeroed() {
        let row = value_holding(&holding("AAPL", 4), None);
        assert!(!row.priced);
        assert_eq!(row.quantity, Decimal::from(4));
        assert_eq!(row.total_value, Decimal::ZERO);
        assert_eq!(row.profit_loss_pct, Decimal::ZERO);
    }

    #[test]
    fn test_zero_previous_close_has_zero_pct() {
        let row = value_holding(&holding("NEW", 1), Some(&quote("5", "0")));
        assert_eq!(row.profit_loss_pct, Decimal::ZERO);
        assert_eq!(row.total_value, Decimal::from(5));
    }

    #[test]
    fn test_summarize() {
        let rows = vec![
            value_holding(&holding("AAPL", 2), Some(&quote("110", "100"))),
            value_holding(&holding("TSLA", 1), Some(&quote("190", "200"))),
            value_holding(&holding("MSFT", 5), None),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.total_investment, Decimal::from(400));
        assert_eq!(summary.total_value, Decimal::from(410));
        assert_eq!(summary.total_profit_loss, Decimal::from(10));
        assert_eq!(summary.total_profit_loss_pct, Decimal::from_str("2.5").unwrap());
    }

    #[test]
    fn test_overflowing_quote_is_left_unpriced() {
        let huge = Quote {
            current: Decimal::MAX,
            ..quote("0", "1")
        };
        let row = value_holding(&holding("AAPL", 2), Some(&huge));
        assert!(!row.priced);
        assert_eq!(row.total_value, Decimal::ZERO);

        let negative = Quote {
            current: Decimal::MIN,
            ..quote("0", "1")
        };
        assert!(!value_holding(&holding("AAPL", 1), Some(&negative)).priced);
    }

    #[test]
    fn test_summarize_saturates_instead_of_overflowing() {
        let mut rows = vec![
            value_holding(&holding("AAPL", 1), Some(&quote("0", "1"))),
            value_holding(&holding("TSLA", 1), Some(&quote("0", "1"))),
        ];
        for row in &mut rows {
            row.total_value = Decimal::MAX;
        }
        let summary = summarize(&rows);
        assert_eq!(summary.total_value, Decimal::MAX);
        assert_eq!(summary.total_investment, Decimal::from(2));
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), PortfolioSummary::default());
    }
}
