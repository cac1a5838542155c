//! Active-symbol tracking and stale-tick filtering.

use crate::domain::series::SeriesBuffer;
use crate::shared::Symbol;
use crate::ws::SubscriptionSink;

/// Where the controller is in its subscribe cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// No subscription frame written yet.
    Idle,
    /// A frame for the active symbol is owed to the connection.
    Subscribing,
    /// The last frame written names the active symbol.
    Subscribed,
}

/// Reacts to symbol selection: resets the series, (re)subscribes, and decides
/// which inbound ticks belong to the current subscription.
///
/// Subscriptions are only written while the sink is `Open`. A selection made
/// while connecting or reconnecting is held as pending and flushed by
/// [`on_open`](Self::on_open).
#[derive(Debug, Clone)]
pub struct SubscriptionController {
    active: Symbol,
    state: SubscriptionState,
    generation: Option<u64>,
    pending: bool,
}

impl SubscriptionController {
    pub fn new(initial: Symbol) -> Self {
        Self {
            active: initial,
            state: SubscriptionState::Idle,
            generation: None,
            pending: false,
        }
    }

    pub fn active(&self) -> &Symbol {
        &self.active
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Generation of the current subscription, `None` until one is written.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The connection reached `Open`.
    ///
    /// Sends the active symbol on first open or when a selection is pending.
    /// After a plain reconnect the connection replays the last frame itself,
    /// so nothing is sent. Returns whether a frame was sent.
    pub fn on_open<S: SubscriptionSink + ?Sized>(&mut self, sink: &S) -> bool {
        if self.state == SubscriptionState::Idle || self.pending {
            self.subscribe(sink)
        } else {
            false
        }
    }

    /// Retry a subscription frame that could not be queued.
    ///
    /// Does nothing unless a frame is pending and the sink is open.
    pub fn flush_pending<S: SubscriptionSink + ?Sized>(&mut self, sink: &S) -> bool {
        if self.pending && sink.connection_state().is_open() {
            self.subscribe(sink)
        } else {
            false
        }
    }

    /// The user picked `symbol`.
    ///
    /// Re-selecting the active symbol is a no-op. Otherwise the series is
    /// emptied before anything else happens, then a frame is sent if the sink
    /// is open. Returns whether a frame was sent.
    pub fn select<S: SubscriptionSink + ?Sized>(
        &mut self,
        symbol: Symbol,
        sink: &S,
        series: &mut SeriesBuffer,
    ) -> bool {
        if symbol == self.active {
            return false;
        }

        tracing::debug!("Active symbol {} -> {}", self.active, symbol);
        self.active = symbol;
        self.generation = None;
        series.reset();

        if self.state == SubscriptionState::Idle {
            // first Open will subscribe to whatever is active then
            return false;
        }

        self.state = SubscriptionState::Subscribing;
        self.subscribe(sink)
    }

    /// Whether a tick stamped with `generation` (and optionally tagged with
    /// the symbol it is for) belongs to the current subscription.
    pub fn accepts(&self, generation: u64, symbol: Option<&Symbol>) -> bool {
        self.state == SubscriptionState::Subscribed
            && self.generation == Some(generation)
            && symbol.map_or(true, |s| s == &self.active)
    }

    fn subscribe<S: SubscriptionSink + ?Sized>(&mut self, sink: &S) -> bool {
        if !sink.connection_state().is_open() {
            self.pending = true;
            return false;
        }

        self.state = SubscriptionState::Subscribing;
        match sink.send(&self.active) {
            Ok(generation) => {
                tracing::info!("Subscribed to {} (generation {})", self.active, generation);
                self.generation = Some(generation);
                self.state = SubscriptionState::Subscribed;
                self.pending = false;
                true
            }
            Err(e) => {
                tracing::warn!("Subscribe to {} failed: {}", self.active, e);
                self.pending = true;
                false
            }
        }
    }
}
