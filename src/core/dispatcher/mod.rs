//! # Dispatcher Module
//!
//! Owns the pending-event queue and drives the notify loop.
//!
//! ## Loop
//! 1. **Idle** - pull the next record; stop (**Closed**) when the source is exhausted
//! 2. Decode it; records without an event are discarded
//! 3. **Draining** - push the event, then pop and notify until the queue
//!    is empty, including everything listeners emit along the way
//! 4. Back to **Idle**
//!
//! Emitted events are appended to the tail, so a cascade is handled
//! breadth-first and fully resolved before the next record is read.

mod executor;
mod state;

pub use executor::{DecodePolicy, Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use state::{DispatchState, RunSummary};
