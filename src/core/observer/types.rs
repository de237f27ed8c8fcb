//! Notice type definitions for channel-based observers.

use crate::core::dispatcher::{DispatchState, RunSummary};
use crate::events::{EventCode, Origin};
use serde::{Deserialize, Serialize};

/// One report from the dispatcher, as sent over a [`NoticeChannel`](super::NoticeChannel)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DispatchNotice {
    /// The dispatcher moved between states
    StateChanged {
        from: DispatchState,
        to: DispatchState,
    },
    /// An event was delivered to listeners
    Dispatched {
        code: EventCode,
        origin: Origin,
        delivered: usize,
    },
    /// A record decoded to no event
    RecordSkipped { record: usize },
    /// A record failed to decode
    DecodeFailed { record: usize, message: String },
    /// A listener returned an error
    ListenerFailed {
        listener: String,
        code: EventCode,
        message: String,
    },
    /// The record source failed
    SourceFailed { message: String },
    /// The run completed
    Closed { summary: RunSummary },
}
