//! # event-relay CLI
//!
//! Command-line interface for the event pipeline.
//!
//! ## Usage
//! ```bash
//! event-relay logs data.txt
//! event-relay logs data.txt --strict --output json
//! event-relay average quotes.csv --window 10
//! ```

mod cli;

use event_relay::Result;

fn main() -> Result<()> {
    cli::run()
}
