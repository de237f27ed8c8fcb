//! Moving average of opening prices.

use super::Quote;
use crate::core::listener::{InterestSet, Listener};
use crate::error::{ListenerError, PipelineError};
use crate::events::Emitter;
use std::collections::VecDeque;

/// Keeps the average opening price of the latest `window` quotes
#[derive(Debug)]
pub struct MovingAverage {
    interests: InterestSet,
    window: usize,
    prices: VecDeque<f64>,
}

impl MovingAverage {
    /// Create a moving average over `window` quotes
    pub fn new(window: usize) -> Result<Self, PipelineError> {
        if window == 0 {
            return Err(PipelineError::Config(
                "moving average window must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            interests: InterestSet::of([Quote::CODE]),
            window,
            prices: VecDeque::with_capacity(window),
        })
    }

    /// Add a price, dropping the oldest once the window is full
    pub fn add(&mut self, price: f64) {
        if self.prices.len() == self.window {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }

    /// Average of the prices in the window (0.0 when empty)
    pub fn average(&self) -> f64 {
        if self.prices.is_empty() {
            return 0.0;
        }
        self.prices.iter().sum::<f64>() / self.prices.len() as f64
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of prices currently in the window
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl Listener<Quote> for MovingAverage {
    fn name(&self) -> &str {
        "moving-average"
    }

    fn interests(&self) -> &InterestSet {
        &self.interests
    }

    fn process(&mut self, quote: &Quote, _emitter: &Emitter<Quote>) -> Result<(), ListenerError> {
        if !quote.open.is_finite() || quote.open < 0.0 {
            return Err(ListenerError::Rejected {
                code: Quote::CODE,
                reason: format!("invalid opening price {}", quote.open),
            });
        }
        self.add(quote.open);
        Ok(())
    }
}
