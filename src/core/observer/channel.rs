//! Crossbeam transport for [`DispatchNotice`] values.
//!
//! The dispatcher runs on the caller's thread; a progress display or a
//! test harness reads notices on the other end.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use super::{DispatchNotice, DispatchObserver};
use crate::core::dispatcher::{DispatchState, RunSummary};
use crate::error::{DecodeError, ListenerError, SourceError};
use crate::events::{EventCode, Origin};

/// Write half, owned by a [`ChannelObserver`]
#[derive(Clone)]
pub struct NoticeSender {
    inner: Sender<DispatchNotice>,
}

impl NoticeSender {
    /// Notices sent after the reader hung up are dropped; the run carries on.
    pub fn send(&self, notice: DispatchNotice) {
        let _ = self.inner.send(notice);
    }
}

/// Read half for whoever follows the run
pub struct NoticeReceiver {
    inner: Receiver<DispatchNotice>,
}

impl NoticeReceiver {
    /// Next queued notice, or `None` if nothing is waiting
    pub fn try_recv(&self) -> Option<DispatchNotice> {
        self.inner.try_recv().ok()
    }

    /// Every notice already queued, oldest first
    pub fn pending(&self) -> Vec<DispatchNotice> {
        self.inner.try_iter().collect()
    }

    /// Blocking iterator; finishes when the dispatcher (and with it the
    /// observer) has been dropped.
    pub fn iter(&self) -> impl Iterator<Item = DispatchNotice> + '_ {
        self.inner.iter()
    }
}

/// Constructors for a sender/receiver pair
pub struct NoticeChannel;

impl NoticeChannel {
    pub fn new() -> (NoticeSender, NoticeReceiver) {
        Self::wrap(unbounded())
    }

    /// At most `capacity` notices in flight. Once full, the dispatcher
    /// waits for the reader before reporting again.
    pub fn bounded(capacity: usize) -> (NoticeSender, NoticeReceiver) {
        Self::wrap(bounded(capacity))
    }

    fn wrap(
        (sender, receiver): (Sender<DispatchNotice>, Receiver<DispatchNotice>),
    ) -> (NoticeSender, NoticeReceiver) {
        (
            NoticeSender { inner: sender },
            NoticeReceiver { inner: receiver },
        )
    }
}

/// Observer that forwards every report as a [`DispatchNotice`]
#[derive(Clone)]
pub struct ChannelObserver {
    sender: NoticeSender,
}

impl ChannelObserver {
    pub fn new(sender: NoticeSender) -> Self {
        Self { sender }
    }
}

impl DispatchObserver for ChannelObserver {
    fn on_transition(&self, from: DispatchState, to: DispatchState) {
        self.sender.send(DispatchNotice::StateChanged { from, to });
    }

    fn on_dispatch(&self, code: &EventCode, origin: Origin, delivered: usize) {
        self.sender.send(DispatchNotice::Dispatched {
            code: code.clone(),
            origin,
            delivered,
        });
    }

    fn on_skipped(&self, record: usize) {
        self.sender.send(DispatchNotice::RecordSkipped { record });
    }

    fn on_decode_error(&self, record: usize, error: &DecodeError) {
        self.sender.send(DispatchNotice::DecodeFailed {
            record,
            message: error.to_string(),
        });
    }

    fn on_listener_error(&self, listener: &str, code: &EventCode, error: &ListenerError) {
        self.sender.send(DispatchNotice::ListenerFailed {
            listener: listener.to_string(),
            code: code.clone(),
            message: error.to_string(),
        });
    }

    fn on_source_error(&self, error: &SourceError) {
        self.sender.send(DispatchNotice::SourceFailed {
            message: error.to_string(),
        });
    }

    fn on_closed(&self, summary: &RunSummary) {
        self.sender.send(DispatchNotice::Closed {
            summary: summary.clone(),
        });
    }
}
