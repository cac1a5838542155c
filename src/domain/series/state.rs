//! Series state container — app-owned, SDK-provided update logic.

use super::PriceSample;
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Number of samples the live chart keeps.
pub const SERIES_CAPACITY: usize = 30;

/// Rolling window of the most recent price samples for one symbol.
///
/// Insertion order is arrival order; the oldest sample is evicted first once
/// the window is full. `delta` is the price change introduced by the most
/// recent `append`, or zero when that append had no predecessor.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    samples: VecDeque<PriceSample>,
    capacity: usize,
    delta: Decimal,
}

impl SeriesBuffer {
    pub fn new() -> Self {
        Self::with_capacity(SERIES_CAPACITY)
    }

    /// A buffer holding at most `capacity` samples (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            delta: Decimal::ZERO,
        }
    }

    /// Append a sample at the tail, evicting the head if at capacity.
    ///
    /// Returns the updated window for rendering.
    pub fn append(&mut self, sample: PriceSample) -> &VecDeque<PriceSample> {
        self.delta = match self.samples.back() {
            Some(prev) => sample.price - prev.price,
            None => Decimal::ZERO,
        };
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        &self.samples
    }

    /// Empty the window and clear the derived price/delta.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.delta = Decimal::ZERO;
    }

    pub fn samples(&self) -> &VecDeque<PriceSample> {
        &self.samples
    }

    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.back()
    }

    /// Last known price, `None` right after a reset.
    pub fn latest_price(&self) -> Option<Decimal> {
        self.samples.back().map(|s| s.price)
    }

    pub fn delta(&self) -> Decimal {
        self.delta
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for SeriesBuffer {
    fn default() -> Self {
        Self::new()
    }
}
