//! Dashboard behaviour driven frame-by-frame through a recording sink.
//!
//! The sink stands in for the socket: it reports a connection state and
//! records every subscription frame the dashboard asks to send.

use std::cell::{Cell, RefCell};
use std::str::FromStr;

use rust_decimal::Decimal;
use stockstream_sdk::dashboard::{DashboardUpdate, LiveDashboard};
use stockstream_sdk::error::WsError;
use stockstream_sdk::shared::Symbol;
use stockstream_sdk::ws::{parse_frame, ConnectionState, SubscriptionSink, WsEvent};

#[derive(Default)]
struct RecordingSink {
    state: Cell<Option<ConnectionState>>,
    sent: RefCell<Vec<String>>,
}

impl RecordingSink {
    fn in_state(state: ConnectionState) -> Self {
        Self {
            state: Cell::new(Some(state)),
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl SubscriptionSink for RecordingSink {
    fn connection_state(&self) -> ConnectionState {
        self.state.get().unwrap_or(ConnectionState::Connecting)
    }

    fn send(&self, symbol: &Symbol) -> Result<u64, WsError> {
        if !self.connection_state().is_open() {
            return Err(WsError::NotConnected);
        }
        self.sent.borrow_mut().push(symbol.to_string());
        Ok(self.sent.borrow().len() as u64)
    }
}

/// Wrap a raw frame the way the connection task does.
fn frame(generation: u64, text: &str) -> WsEvent {
    let kind = parse_frame(text)
        .expect("well-formed frame")
        .expect("known event");
    WsEvent::Message { generation, kind }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn open_dashboard() -> LiveDashboard<RecordingSink> {
    let mut dash = LiveDashboard::new(
        RecordingSink::in_state(ConnectionState::Open),
        Symbol::from("AAPL"),
    );
    assert_eq!(
        dash.handle_event(WsEvent::Connected),
        Some(DashboardUpdate::Status(ConnectionState::Open))
    );
    dash
}

const MOVERS_FOUR: &str = r#"{"event":"market_movers","data":[
    {"symbol":"AAPL","name":"Apple","price":190.1,"change":1.2,"isUp":true},
    {"symbol":"TSLA","name":"Tesla","price":240.5,"change":-3.4,"isUp":false},
    {"symbol":"MSFT","name":"Microsoft","price":410.0,"change":0.5,"isUp":true},
    {"symbol":"NVDA","name":"Nvidia","price":880.2,"change":-0.1,"isUp":false}
]}"#;

const MOVERS_TWO: &str = r#"{"event":"market_movers","data":[
    {"symbol":"META","name":"Meta","price":500.0,"change":2.0,"isUp":true},
    {"symbol":"AMZN","name":"Amazon","price":180.0,"change":-1.0,"isUp":false}
]}"#;

#[test]
fn subscribes_once_on_open() {
    let dash = open_dashboard();
    assert_eq!(*dash.connection().sent.borrow(), vec!["AAPL".to_string()]);
    assert_eq!(dash.controller().generation(), Some(1));
}

#[test]
fn first_tick_then_second_tick() {
    let mut dash = open_dashboard();

    let update = dash.handle_event(frame(
        1,
        r#"{"event":"stock_update","data":{"price":150.00,"time":"2024-01-01T10:00:00Z"}}"#,
    ));
    assert_eq!(
        update,
        Some(DashboardUpdate::Tick {
            price: dec("150.00"),
            delta: Decimal::ZERO,
            len: 1,
        })
    );

    let update = dash.handle_event(frame(
        1,
        r#"{"event":"stock_update","data":{"price":151.25,"time":"2024-01-01T10:00:01Z"}}"#,
    ));
    assert_eq!(
        update,
        Some(DashboardUpdate::Tick {
            price: dec("151.25"),
            delta: dec("1.25"),
            len: 2,
        })
    );
    assert_eq!(dash.delta(), dec("1.25"));
    assert_eq!(dash.latest_price(), Some(dec("151.25")));
}

#[test]
fn movers_frames_replace_rather_than_merge() {
    let mut dash = open_dashboard();

    assert_eq!(
        dash.handle_event(frame(1, MOVERS_FOUR)),
        Some(DashboardUpdate::Movers { count: 4 })
    );
    assert_eq!(
        dash.handle_event(frame(1, MOVERS_TWO)),
        Some(DashboardUpdate::Movers { count: 2 })
    );

    let symbols: Vec<&str> = dash.movers().movers().iter().map(|m| m.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["META", "AMZN"]);
    assert!(dash.movers().get(&Symbol::from("AAPL")).is_none());
}

#[test]
fn movers_do_not_touch_the_series() {
    let mut dash = open_dashboard();
    dash.handle_event(frame(
        1,
        r#"{"event":"stock_update","data":{"price":10,"time":1704103200}}"#,
    ));
    dash.handle_event(frame(1, MOVERS_FOUR));
    assert_eq!(dash.series().len(), 1);
}

#[test]
fn switching_symbol_empties_series_and_sends_one_frame() {
    let mut dash = open_dashboard();
    for (i, price) in ["100", "101", "102"].iter().enumerate() {
        dash.handle_event(frame(
            1,
            &format!(
                r#"{{"event":"stock_update","data":{{"price":{},"time":{}}}}}"#,
                price,
                1_704_103_200 + i
            ),
        ));
    }
    assert_eq!(dash.series().len(), 3);

    assert!(dash.select_symbol(Symbol::from("TSLA")));
    assert!(dash.series().is_empty());
    assert_eq!(dash.active_symbol().as_str(), "TSLA");

    let sent = dash.connection().sent.borrow().clone();
    assert_eq!(sent.iter().filter(|s| s.as_str() == "TSLA").count(), 1);

    // In flight before the server saw the switch.
    let late = dash.handle_event(frame(
        1,
        r#"{"event":"stock_update","data":{"price":103,"time":1704103210}}"#,
    ));
    assert_eq!(late, None);
    assert!(dash.series().is_empty());
    assert_eq!(dash.stale_ticks(), 1);

    let fresh = dash.handle_event(frame(
        2,
        r#"{"event":"stock_update","data":{"price":240.5,"time":1704103211,"symbol":"TSLA"}}"#,
    ));
    assert_eq!(
        fresh,
        Some(DashboardUpdate::Tick {
            price: dec("240.5"),
            delta: Decimal::ZERO,
            len: 1,
        })
    );
}

#[test]
fn reselecting_the_same_symbol_is_a_noop() {
    let mut dash = open_dashboard();
    dash.handle_event(frame(
        1,
        r#"{"event":"stock_update","data":{"price":100,"time":1704103200}}"#,
    ));
    assert!(!dash.select_symbol(Symbol::from("AAPL")));
    assert_eq!(dash.series().len(), 1);
    assert_eq!(dash.connection().sent.borrow().len(), 1);
}

#[test]
fn never_open_sends_nothing() {
    let mut dash = LiveDashboard::new(RecordingSink::default(), Symbol::from("AAPL"));
    assert_eq!(dash.status(), ConnectionState::Connecting);

    assert!(!dash.select_symbol(Symbol::from("TSLA")));
    assert_eq!(dash.status(), ConnectionState::Connecting);
    assert!(dash.connection().sent.borrow().is_empty());
    assert_eq!(dash.controller().generation(), None);
}

#[test]
fn selection_made_while_connecting_goes_out_on_open() {
    let mut dash = LiveDashboard::new(RecordingSink::default(), Symbol::from("AAPL"));
    dash.select_symbol(Symbol::from("MSFT"));

    dash.connection().state.set(Some(ConnectionState::Open));
    dash.handle_event(WsEvent::Connected);

    assert_eq!(*dash.connection().sent.borrow(), vec!["MSFT".to_string()]);
}

#[test]
fn disconnect_reports_the_connection_state() {
    let mut dash = open_dashboard();
    dash.connection()
        .state
        .set(Some(ConnectionState::Reconnecting));
    let update = dash.handle_event(WsEvent::Disconnected {
        code: Some(1006),
        reason: "Abnormal".into(),
    });
    assert_eq!(
        update,
        Some(DashboardUpdate::Status(ConnectionState::Reconnecting))
    );
}

#[test]
fn malformed_frames_never_reach_the_view() {
    assert!(parse_frame(r#"{"event":"stock_update","data":{"price":"abc","time":0}}"#).is_err());
    assert!(parse_frame("not json").is_err());
    assert!(parse_frame(r#"{"event":"heartbeat","data":{}}"#)
        .unwrap()
        .is_none());

    let mut dash = open_dashboard();
    assert_eq!(dash.handle_event(WsEvent::Error("bad frame".into())), None);
    assert!(dash.series().is_empty());
}
