//! WebSocket layer — frame parsing, events, connection state.
//!
//! The market-data protocol is asymmetric:
//! - outbound frames are a bare symbol string (`AAPL`), one per (re)subscription
//! - inbound frames are JSON envelopes `{"event": ..., "data": ...}`
//!
//! The transport lives in `native.rs` (`ws-native` feature). This module
//! defines the shared message/event types and the [`SubscriptionSink`] seam
//! the subscription logic is written against.

pub mod subscriptions;

#[cfg(feature = "ws-native")]
pub mod native;

use crate::domain::movers::wire::WsMarketMover;
use crate::domain::series::wire::StockUpdate;
use crate::error::WsError;
use crate::shared::Symbol;
use serde::Deserialize;

pub use subscriptions::{SubscriptionController, SubscriptionState};

/// `event` tag of a price tick frame.
pub const STOCK_UPDATE_EVENT: &str = "stock_update";

/// `event` tag of a movers snapshot frame.
pub const MARKET_MOVERS_EVENT: &str = "market_movers";

// ─── Inbound frames ──────────────────────────────────────────────────────────

/// Untyped inbound envelope. `data` is decoded once `event` is known.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFrame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A recognized inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    StockUpdate(StockUpdate),
    MarketMovers(Vec<WsMarketMover>),
}

/// Parse one inbound text frame.
///
/// - `Ok(Some(kind))` for a recognized, well-formed frame
/// - `Ok(None)` for an unrecognized `event` tag (ignored by policy)
/// - `Err(Deserialization)` for malformed JSON or a malformed `data` payload
pub fn parse_frame(text: &str) -> Result<Option<Kind>, WsError> {
    let raw: RawFrame = serde_json::from_str(text)
        .map_err(|e| WsError::Deserialization(format!("envelope: {}", e)))?;

    match raw.event.as_str() {
        STOCK_UPDATE_EVENT => serde_json::from_value::<StockUpdate>(raw.data)
            .map(|update| Some(Kind::StockUpdate(update)))
            .map_err(|e| WsError::Deserialization(format!("{}: {}", STOCK_UPDATE_EVENT, e))),
        MARKET_MOVERS_EVENT => serde_json::from_value::<Vec<WsMarketMover>>(raw.data)
            .map(|movers| Some(Kind::MarketMovers(movers)))
            .map_err(|e| {
                WsError::Deserialization(format!("{}: {}", MARKET_MOVERS_EVENT, e))
            }),
        _ => Ok(None),
    }
}

// ─── WsEvent ─────────────────────────────────────────────────────────────────

/// High-level events emitted by the WS client to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum WsEvent {
    /// Handshake completed (initial connect or reconnect).
    Connected,
    /// A parsed message from the server, stamped with the generation of the
    /// last subscription frame written before it arrived.
    Message { generation: u64, kind: Kind },
    /// Connection lost. The connection state is already updated when this is emitted.
    Disconnected { code: Option<u16>, reason: String },
    /// Waiting `delay_ms` before reconnect attempt `attempt`.
    Reconnecting { attempt: u32, delay_ms: u64 },
    /// A malformed frame or failed connection attempt. Never fatal.
    Error(String),
    /// Reconnect budget exhausted; the connection is closed for good.
    MaxReconnectReached,
}

// ─── Connection state ────────────────────────────────────────────────────────

/// Lifecycle of one streaming connection.
///
/// `Connecting → Open` on handshake; `Open → Reconnecting` on an unexpected
/// drop while reconnects remain; anything `→ Closed` on explicit close, normal
/// server close, or an exhausted reconnect budget. `Closed` is terminal for a
/// given `open()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    Reconnecting = 2,
    Closed = 3,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    /// Status text for a connection indicator.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting…",
            ConnectionState::Open => "Live",
            ConnectionState::Reconnecting => "Reconnecting…",
            ConnectionState::Closed => "Disconnected",
        }
    }
}

impl From<u8> for ConnectionState {
    fn from(v: u8) -> Self {
        match v {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            2 => ConnectionState::Reconnecting,
            _ => ConnectionState::Closed,
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Subscription seam ───────────────────────────────────────────────────────

/// Anything subscription frames can be written to.
///
/// Implemented by the native `StreamConnection`; tests substitute recorders.
pub trait SubscriptionSink {
    fn connection_state(&self) -> ConnectionState;

    /// Queue a subscription frame for `symbol`, returning its generation.
    /// Generations are strictly increasing per connection.
    fn send(&self, symbol: &Symbol) -> Result<u64, WsError>;
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Configuration for the WS client.
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub url: String,
    /// Reconnect after unexpected drops. `false` makes the first drop terminal.
    pub reconnect: bool,
    pub max_reconnect_attempts: u32,
    pub base_reconnect_delay_ms: u32,
    pub max_reconnect_delay_ms: u32,
    /// Handshake timeout. `None` (the default) waits indefinitely, leaving the
    /// connection in `Connecting` until the server answers or `close()` is called.
    pub connect_timeout_ms: Option<u64>,
    /// Capacity of the event channel; events beyond it are dropped.
    pub event_buffer: usize,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: crate::network::DEFAULT_WS_URL.to_string(),
            reconnect: true,
            max_reconnect_attempts: 10,
            base_reconnect_delay_ms: 1000,
            max_reconnect_delay_ms: 30_000,
            connect_timeout_ms: None,
            event_buffer: 256,
        }
    }
}

impl WsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_parse_stock_update() {
        let kind = parse_frame(
            r#"{"event":"stock_update","data":{"price":150.00,"time":"2024-01-01T10:00:00Z"}}"#,
        )
        .unwrap()
        .unwrap();
        match kind {
            Kind::StockUpdate(u) => {
                assert_eq!(u.price, Decimal::from_str("150.00").unwrap());
                assert!(u.symbol.is_none());
            }
            other => panic!("expected StockUpdate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_market_movers() {
        let kind = parse_frame(
            r#"{"event":"market_movers","data":[
                {"symbol":"AAPL","name":"Apple Inc.","price":190.1,"change":1.2,"isUp":true},
                {"symbol":"TSLA","name":"Tesla Inc.","price":180.0,"change":-3.4,"isUp":false}
            ]}"#,
        )
        .unwrap()
        .unwrap();
        match kind {
            Kind::MarketMovers(movers) => {
                assert_eq!(movers.len(), 2);
                assert_eq!(movers[1].symbol.as_str(), "TSLA");
                assert_eq!(movers[1].is_up, Some(false));
            }
            other => panic!("expected MarketMovers, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        assert_eq!(parse_frame(r#"{"event":"heartbeat","data":{}}"#).unwrap(), None);
        assert_eq!(parse_frame(r#"{"event":"news"}"#).unwrap(), None);
    }

    #[test]
    fn test_malformed_frames_are_errors() {
        assert!(matches!(
            parse_frame("not json"),
            Err(WsError::Deserialization(_))
        ));
        assert!(matches!(
            parse_frame(r#"{"data":{}}"#),
            Err(WsError::Deserialization(_))
        ));
        assert!(matches!(
            parse_frame(r#"{"event":"stock_update","data":{"price":"n/a","time":"2024-01-01T10:00:00Z"}}"#),
            Err(WsError::Deserialization(_))
        ));
        assert!(matches!(
            parse_frame(r#"{"event":"market_movers","data":{"symbol":"AAPL"}}"#),
            Err(WsError::Deserialization(_))
        ));
    }

    #[test]
    fn test_connection_state_roundtrip_u8() {
        for state in [
            ConnectionState::Connecting,
            ConnectionState::Open,
            ConnectionState::Reconnecting,
            ConnectionState::Closed,
        ] {
            assert_eq!(ConnectionState::from(state as u8), state);
        }
        assert_eq!(ConnectionState::from(200), ConnectionState::Closed);
    }

    #[test]
    fn test_ws_config_default() {
        let config = WsConfig::default();
        assert_eq!(config.url, crate::network::DEFAULT_WS_URL);
        assert!(config.reconnect);
        assert_eq!(config.connect_timeout_ms, None);
    }
}
