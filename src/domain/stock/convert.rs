//! Conversions from wire types to domain types for stocks.

use super::wire::{HistoryPointResponse, QuoteResponse};
use super::{ClosePoint, Quote};
use chrono::DateTime;

impl From<QuoteResponse> for Quote {
    fn from(q: QuoteResponse) -> Self {
        Self {
            current: q.c,
            change: q.d,
            change_percent: q.dp,
            high: q.h,
            low: q.l,
            open: q.o,
            previous_close: q.pc,
            timestamp: q
                .t
                .filter(|t| *t > 0)
                .and_then(|t| DateTime::from_timestamp(t, 0)),
        }
    }
}

impl From<HistoryPointResponse> for ClosePoint {
    fn from(p: HistoryPointResponse) -> Self {
        Self {
            date: p.date,
            close: p.close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::wire::HistoryResponse;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_quote_conversion() {
        let wire: QuoteResponse = serde_json::from_str(
            r#"{"c":189.84,"d":1.12,"dp":0.5934,"h":190.32,"l":188.19,"o":189.2,"pc":188.72,"t":1704484800}"#,
        )
        .unwrap();
        let quote = Quote::from(wire);
        assert_eq!(quote.current, Decimal::from_str("189.84").unwrap());
        assert_eq!(quote.previous_close, Decimal::from_str("188.72").unwrap());
        assert_eq!(quote.change, Some(Decimal::from_str("1.12").unwrap()));
        assert_eq!(quote.timestamp.unwrap().timestamp(), 1_704_484_800);
        assert!(!quote.is_empty());
    }

    #[test]
    fn test_unknown_symbol_quote_is_empty() {
        let wire: QuoteResponse = serde_json::from_str(
            r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#,
        )
        .unwrap();
        let quote = Quote::from(wire);
        assert!(quote.is_empty());
        assert_eq!(quote.change, None);
        assert_eq!(quote.timestamp, None);
    }

    #[test]
    fn test_history_conversion() {
        let wire: HistoryResponse = serde_json::from_str(
            r#"{"data":[{"date":"2024-01-02","close":185.63999938964844},{"date":"2024-01-03","close":184.25}]}"#,
        )
        .unwrap();
        let points: Vec<ClosePoint> = wire.data.into_iter().map(ClosePoint::from).collect();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[1].close, Decimal::from_str("184.25").unwrap());
    }
}
