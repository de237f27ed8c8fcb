//! # Observer Module
//!
//! The dispatcher reports what it does through an injected
//! [`DispatchObserver`] instead of a process-wide logger.
//!
//! ## Implementations
//! - [`TracingObserver`] - structured `tracing` records (the default)
//! - [`ChannelObserver`] - forwards [`DispatchNotice`]s over a channel,
//!   so a UI on another thread can show progress
//! - [`NullObserver`] - discards everything
//!
//! Two observers can be combined with a tuple: `(TracingObserver, channel)`.

mod channel;
mod types;

pub use channel::{ChannelObserver, NoticeChannel, NoticeReceiver, NoticeSender};
pub use types::DispatchNotice;

use crate::core::dispatcher::{DispatchState, RunSummary};
use crate::error::{DecodeError, ListenerError, SourceError};
use crate::events::{EventCode, Origin};
use tracing::{debug, error, info, trace, warn};

/// Receives structured reports from the dispatcher
///
/// Every method has an empty default, so implementations only
/// override what they care about.
pub trait DispatchObserver {
    /// The dispatcher moved between states
    fn on_transition(&self, _from: DispatchState, _to: DispatchState) {}

    /// An event was handed to `delivered` listeners
    fn on_dispatch(&self, _code: &EventCode, _origin: Origin, _delivered: usize) {}

    /// A record decoded to no event and was discarded
    fn on_skipped(&self, _record: usize) {}

    /// A record failed to decode
    fn on_decode_error(&self, _record: usize, _error: &DecodeError) {}

    /// A listener returned an error; the dispatcher carried on
    fn on_listener_error(&self, _listener: &str, _code: &EventCode, _error: &ListenerError) {}

    /// The record source failed; the run is about to end
    fn on_source_error(&self, _error: &SourceError) {}

    /// The source is exhausted and the queue is empty
    fn on_closed(&self, _summary: &RunSummary) {}
}

/// Logs dispatcher activity through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DispatchObserver for TracingObserver {
    fn on_transition(&self, from: DispatchState, to: DispatchState) {
        trace!(%from, %to, "dispatcher state changed");
    }

    fn on_dispatch(&self, code: &EventCode, origin: Origin, delivered: usize) {
        debug!(%code, ?origin, delivered, "event dispatched");
    }

    fn on_skipped(&self, record: usize) {
        trace!(record, "record produced no event");
    }

    fn on_decode_error(&self, record: usize, error: &DecodeError) {
        warn!(record, %error, "failed to decode record");
    }

    fn on_listener_error(&self, listener: &str, code: &EventCode, error: &ListenerError) {
        warn!(listener, %code, %error, "listener failed");
    }

    fn on_source_error(&self, error: &SourceError) {
        error!(%error, "record source failed");
    }

    fn on_closed(&self, summary: &RunSummary) {
        info!(
            records = summary.records_read,
            primary = summary.primary_events,
            emitted = summary.emitted_events,
            decode_errors = summary.decode_errors,
            listener_errors = summary.listener_errors,
            duration_ms = summary.duration_ms,
            "dispatcher closed"
        );
    }
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl DispatchObserver for NullObserver {}

impl<O: DispatchObserver + ?Sized> DispatchObserver for Box<O> {
    fn on_transition(&self, from: DispatchState, to: DispatchState) {
        (**self).on_transition(from, to)
    }

    fn on_dispatch(&self, code: &EventCode, origin: Origin, delivered: usize) {
        (**self).on_dispatch(code, origin, delivered)
    }

    fn on_skipped(&self, record: usize) {
        (**self).on_skipped(record)
    }

    fn on_decode_error(&self, record: usize, error: &DecodeError) {
        (**self).on_decode_error(record, error)
    }

    fn on_listener_error(&self, listener: &str, code: &EventCode, error: &ListenerError) {
        (**self).on_listener_error(listener, code, error)
    }

    fn on_source_error(&self, error: &SourceError) {
        (**self).on_source_error(error)
    }

    fn on_closed(&self, summary: &RunSummary) {
        (**self).on_closed(summary)
    }
}

impl<A: DispatchObserver, B: DispatchObserver> DispatchObserver for (A, B) {
    fn on_transition(&self, from: DispatchState, to: DispatchState) {
        self.0.on_transition(from, to);
        self.1.on_transition(from, to);
    }

    fn on_dispatch(&self, code: &EventCode, origin: Origin, delivered: usize) {
        self.0.on_dispatch(code, origin, delivered);
        self.1.on_dispatch(code, origin, delivered);
    }

    fn on_skipped(&self, record: usize) {
        self.0.on_skipped(record);
        self.1.on_skipped(record);
    }

    fn on_decode_error(&self, record: usize, error: &DecodeError) {
        self.0.on_decode_error(record, error);
        self.1.on_decode_error(record, error);
    }

    fn on_listener_error(&self, listener: &str, code: &EventCode, error: &ListenerError) {
        self.0.on_listener_error(listener, code, error);
        self.1.on_listener_error(listener, code, error);
    }

    fn on_source_error(&self, error: &SourceError) {
        self.0.on_source_error(error);
        self.1.on_source_error(error);
    }

    fn on_closed(&self, summary: &RunSummary) {
        self.0.on_closed(summary);
        self.1.on_closed(summary);
    }
}
