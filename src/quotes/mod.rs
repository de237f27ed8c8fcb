//! # Quotes Module
//!
//! Daily stock quotes and a moving-average strategy over them.
//!
//! ## Format
//! CSV rows of `date,open,high,low,close,volume`:
//! ```text
//! Date,Open,High,Low,Close,Volume
//! 2017-01-03,115.80,116.33,114.76,116.15,28781865
//! ```
//! A header row and blank lines carry no event.

mod moving_average;

pub use moving_average::MovingAverage;

use crate::core::decoder::Decoder;
use crate::error::DecodeError;
use crate::events::{Event, EventCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// One day of trading for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Quote {
    pub const CODE: EventCode = EventCode::from_static("quote");
}

impl Event for Quote {
    fn code(&self) -> EventCode {
        Self::CODE
    }

    fn value(&self) -> String {
        format!(
            "{} open={} high={} low={} close={} volume={}",
            self.date, self.open, self.high, self.low, self.close, self.volume
        )
    }
}

/// Decodes CSV quote rows
#[derive(Debug, Clone, Default)]
pub struct QuoteDecoder;

impl QuoteDecoder {
    pub fn new() -> Self {
        Self
    }
}

fn price(field: &str, raw: &str) -> Result<f64, DecodeError> {
    raw.parse().map_err(|e| DecodeError::invalid(field, raw, e))
}

impl Decoder for QuoteDecoder {
    type Record = str;
    type Event = Quote;

    fn decode(&self, row: &str) -> Result<Option<Quote>, DecodeError> {
        let row = row.trim();
        if row.is_empty() {
            return Ok(None);
        }

        let cells: Vec<&str> = row.split(',').map(str::trim).collect();
        if cells[0].eq_ignore_ascii_case(COLUMNS[0]) {
            return Ok(None);
        }
        if let Some(missing) = COLUMNS.get(cells.len()) {
            return Err(DecodeError::missing(*missing));
        }

        let date = NaiveDate::parse_from_str(cells[0], "%Y-%m-%d")
            .map_err(|e| DecodeError::invalid("date", cells[0], e))?;
        let volume = cells[5]
            .parse()
            .map_err(|e| DecodeError::invalid("volume", cells[5], e))?;

        Ok(Some(Quote {
            date,
            open: price("open", cells[1])?,
            high: price("high", cells[2])?,
            low: price("low", cells[3])?,
            close: price("close", cells[4])?,
            volume,
        }))
    }
}
