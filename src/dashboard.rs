//! Live dashboard state — one connection, one series, one movers table.
//!
//! [`LiveDashboard`] is the consumer side of the stream: it owns the
//! connection for its whole lifetime, routes every [`WsEvent`] to the
//! series or the movers table, and drives the [`SubscriptionController`].
//!
//! The routing logic is generic over [`SubscriptionSink`] so it can run
//! against a recorder in tests; the `ws-native` feature adds the async
//! `mount` / `next_update` / `close` lifecycle over a real connection.

use crate::domain::movers::{MoverSnapshot, MoversTable};
use crate::domain::series::{PriceSample, SeriesBuffer};
use crate::shared::Symbol;
use crate::ws::{ConnectionState, Kind, SubscriptionController, SubscriptionSink, WsEvent};
use rust_decimal::Decimal;

#[cfg(feature = "ws-native")]
use crate::error::WsError;
#[cfg(feature = "ws-native")]
use crate::ws::native::StreamConnection;
#[cfg(feature = "ws-native")]
use crate::ws::WsConfig;

/// What changed after applying one event — enough to decide what to re-render.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    Status(ConnectionState),
    Tick {
        price: Decimal,
        delta: Decimal,
        len: usize,
    },
    Movers {
        count: usize,
    },
}

pub struct LiveDashboard<C> {
    connection: C,
    controller: SubscriptionController,
    series: SeriesBuffer,
    movers: MoversTable,
    status: ConnectionState,
    stale_ticks: u64,
}

impl<C: SubscriptionSink> LiveDashboard<C> {
    /// Wrap an already-opening connection. Nothing is sent until `Connected`.
    pub fn new(connection: C, initial: Symbol) -> Self {
        let status = connection.connection_state();
        Self {
            connection,
            controller: SubscriptionController::new(initial),
            series: SeriesBuffer::new(),
            movers: MoversTable::new(),
            status,
            stale_ticks: 0,
        }
    }

    /// Apply one connection event. Returns `None` when nothing visible changed.
    pub fn handle_event(&mut self, event: WsEvent) -> Option<DashboardUpdate> {
        if matches!(event, WsEvent::Message { .. }) {
            // Inbound traffic means the socket is up; retry a frame that failed to queue.
            self.controller.flush_pending(&self.connection);
        }

        match event {
            WsEvent::Connected => {
                self.status = ConnectionState::Open;
                self.controller.on_open(&self.connection);
                Some(DashboardUpdate::Status(self.status))
            }
            WsEvent::Message {
                generation,
                kind: Kind::StockUpdate(update),
            } => {
                if !self.controller.accepts(generation, update.symbol.as_ref()) {
                    tracing::debug!(
                        "Dropping stale tick (generation {}, symbol {:?}) for {}",
                        generation,
                        update.symbol,
                        self.controller.active()
                    );
                    self.stale_ticks += 1;
                    return None;
                }
                self.series.append(PriceSample::from(update));
                Some(DashboardUpdate::Tick {
                    price: self.series.latest_price().unwrap_or_default(),
                    delta: self.series.delta(),
                    len: self.series.len(),
                })
            }
            WsEvent::Message {
                kind: Kind::MarketMovers(movers),
                ..
            } => {
                let held = self
                    .movers
                    .replace(movers.into_iter().map(MoverSnapshot::from).collect());
                Some(DashboardUpdate::Movers { count: held.len() })
            }
            WsEvent::Disconnected { .. } => {
                self.status = self.connection.connection_state();
                Some(DashboardUpdate::Status(self.status))
            }
            WsEvent::Reconnecting { .. } => {
                self.status = ConnectionState::Reconnecting;
                Some(DashboardUpdate::Status(self.status))
            }
            WsEvent::MaxReconnectReached => {
                self.status = ConnectionState::Closed;
                Some(DashboardUpdate::Status(self.status))
            }
            WsEvent::Error(msg) => {
                tracing::debug!("Stream error: {}", msg);
                None
            }
        }
    }

    /// The user picked a symbol. Returns whether a subscription frame went out.
    pub fn select_symbol(&mut self, symbol: Symbol) -> bool {
        self.controller
            .select(symbol, &self.connection, &mut self.series)
    }

    pub fn active_symbol(&self) -> &Symbol {
        self.controller.active()
    }

    pub fn status(&self) -> ConnectionState {
        self.status
    }

    pub fn series(&self) -> &SeriesBuffer {
        &self.series
    }

    pub fn movers(&self) -> &MoversTable {
        &self.movers
    }

    pub fn latest_price(&self) -> Option<Decimal> {
        self.series.latest_price()
    }

    pub fn delta(&self) -> Decimal {
        self.series.delta()
    }

    pub fn controller(&self) -> &SubscriptionController {
        &self.controller
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Ticks rejected as belonging to a superseded subscription.
    pub fn stale_ticks(&self) -> u64 {
        self.stale_ticks
    }
}

#[cfg(feature = "ws-native")]
impl LiveDashboard<StreamConnection> {
    /// Open a connection to `config.url` and subscribe to `initial` once it is up.
    pub async fn mount(config: WsConfig, initial: Symbol) -> Result<Self, WsError> {
        let mut connection = StreamConnection::new(config);
        connection.open().await?;
        Ok(Self::new(connection, initial))
    }

    /// Wait for the next event that changes the view and apply it.
    ///
    /// Returns `None` once the connection is closed and drained. If the task
    /// ended without reporting a drop (a refused handshake), a final
    /// `Status(Closed)` is reported first.
    pub async fn next_update(&mut self) -> Option<DashboardUpdate> {
        loop {
            let Some(event) = self.connection.next_event().await else {
                if self.status == ConnectionState::Closed {
                    return None;
                }
                self.status = ConnectionState::Closed;
                return Some(DashboardUpdate::Status(self.status));
            };
            if let Some(update) = self.handle_event(event) {
                return Some(update);
            }
        }
    }

    /// Tear down: close the socket and stop the connection task.
    pub async fn close(&mut self) {
        self.connection.close().await;
        self.status = ConnectionState::Closed;
    }
}
