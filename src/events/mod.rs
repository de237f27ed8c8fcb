//! # Events Module
//!
//! The event model shared by decoders, listeners and the dispatcher.
//!
//! ## Design
//! Events are a tagged union supplied by the application (usually an
//! enum) implementing [`Event`]. Each variant carries a stable
//! [`EventCode`] that drives listener interest matching. Variants are
//! constructed through an explicit [`VariantRegistry`] built at startup.
//!
//! Listeners never see the pending queue itself. They get an
//! [`Emitter`], which can only append to it.
//!
//! ## Example
//! ```rust,ignore
//! let registry = VariantRegistry::new()
//!     .with_variant(LogEvent::EVENT1, LogEvent::event1_from_line)
//!     .with_variant(LogEvent::EVENT2, LogEvent::event2_from_line);
//!
//! let event = registry.construct(&EventCode::from("Event1"), "... Event1 a=1 b=2")?;
//! assert_eq!(event.code(), LogEvent::EVENT1);
//! ```

mod channel;
mod registry;
mod types;

pub use channel::{Emitter, EventQueue, Origin, Pending};
pub use registry::{Constructor, VariantRegistry};
pub use types::{Event, EventCode};
