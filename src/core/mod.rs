//! # Core Module
//!
//! The dispatch core.
//!
//! ## Modules
//! - `source` - Pulls raw records from files, readers or iterators
//! - `decoder` - Turns one record into zero or one event
//! - `listener` - Subscribers and the ordered listener registry
//! - `dispatcher` - Owns the pending queue and runs the notify loop
//! - `observer` - Structured reporting of what the dispatcher does

pub mod decoder;
pub mod dispatcher;
pub mod listener;
pub mod observer;
pub mod source;

// Re-export commonly used types
pub use decoder::{Decoder, FnDecoder, RegistryDecoder};
pub use dispatcher::{DecodePolicy, Dispatcher, DispatcherBuilder, DispatcherConfig, RunSummary};
pub use listener::{FnListener, InterestSet, Listener};
pub use observer::{DispatchObserver, TracingObserver};
pub use source::{IterSource, LineSource, RecordSource};
