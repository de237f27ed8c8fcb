//! # Event Relay
//!
//! A single-threaded event pipeline: records are decoded into typed
//! events and fanned out to listeners, which can emit further events
//! back into the same pipeline.
//!
//! ## Guarantees
//! - **Ordered** - listeners are notified in registration order
//! - **Breadth-first** - emitted events join the tail of the queue
//! - **Drained** - every cascade finishes before the next record is read
//! - **Isolated** - a failing listener never stops the others
//!
//! ## Architecture
//! - `events` - The event model: codes, variants, the pending queue
//! - `core` - Sources, decoders, listeners and the dispatcher
//! - `error` - Error types
//! - `logline` - Decoder and listeners for timestamped log lines
//! - `quotes` - Decoder and moving average for daily stock quotes

pub mod core;
pub mod error;
pub mod events;
pub mod logline;
pub mod quotes;

// Re-export commonly used types at the crate root
pub use error::{PipelineError, Result};

/// Initialize tracing for the binary
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug`
/// over `warn`. Calling this twice keeps the first subscriber.
pub fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "debug" } else { "warn" })
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
