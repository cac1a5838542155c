//! Conversions from wire types to domain types for trades.

use super::wire::TradeRecordResponse;
use super::{TradeAction, TradeRecord};
use crate::shared::serde_util::flexible_timestamp;
use serde_json::Value;

impl TryFrom<TradeRecordResponse> for TradeRecord {
    type Error = String;

    fn try_from(r: TradeRecordResponse) -> Result<Self, Self::Error> {
        let action = r.action.parse::<TradeAction>()?;
        let timestamp = match &r.timestamp {
            Value::String(s) => flexible_timestamp::parse_str(s)?,
            Value::Number(n) => {
                let epoch = n
                    .as_f64()
                    .ok_or_else(|| format!("Invalid timestamp: {}", n))?;
                flexible_timestamp::from_epoch(epoch)?
            }
            other => return Err(format!("Invalid timestamp: {}", other)),
        };

        Ok(Self {
            action,
            symbol: r.symbol,
            quantity: r.quantity,
            timestamp,
        })
    }
}
