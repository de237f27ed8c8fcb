//! Dispatcher execution implementation.

use super::{DispatchState, RunSummary};
use crate::core::decoder::Decoder;
use crate::core::listener::{Listener, ListenerRegistry};
use crate::core::observer::{DispatchObserver, TracingObserver};
use crate::core::source::RecordSource;
use crate::error::{PipelineError, Result};
use crate::events::{Emitter, Event, EventQueue, Origin, Pending};
use std::borrow::Borrow;
use std::time::Instant;

/// What to do with a record that fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Report the error to the observer and move on (default)
    #[default]
    Skip,
    /// End the run with [`PipelineError::Decode`]
    Abort,
}

/// Configuration for the dispatcher
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    /// Handling of undecodable records
    pub decode_policy: DecodePolicy,
    /// Maximum events processed per record (primary plus emitted)
    pub cascade_limit: Option<usize>,
}

impl DispatcherConfig {
    fn validate(&self) -> Result<()> {
        if self.cascade_limit == Some(0) {
            return Err(PipelineError::Config(
                "cascade limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for dispatcher configuration
pub struct DispatcherBuilder<'a, S, D> {
    source: S,
    decoder: D,
    config: DispatcherConfig,
    observer: Option<Box<dyn DispatchObserver + 'a>>,
}

impl<'a, S, D> DispatcherBuilder<'a, S, D>
where
    S: RecordSource,
    D: Decoder,
    S::Record: Borrow<D::Record>,
{
    /// Create a new dispatcher builder
    pub fn new(source: S, decoder: D) -> Self {
        Self {
            source,
            decoder,
            config: DispatcherConfig::default(),
            observer: None,
        }
    }

    /// Set the decode error policy
    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.config.decode_policy = policy;
        self
    }

    /// Abort on the first undecodable record
    pub fn strict(self, strict: bool) -> Self {
        self.decode_policy(if strict {
            DecodePolicy::Abort
        } else {
            DecodePolicy::Skip
        })
    }

    /// Limit the number of events one record may cause
    pub fn cascade_limit(mut self, limit: usize) -> Self {
        self.config.cascade_limit = Some(limit);
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the observer (defaults to [`TracingObserver`])
    pub fn observer(mut self, observer: impl DispatchObserver + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> Result<Dispatcher<'a, S, D>> {
        self.config.validate()?;

        Ok(Dispatcher {
            source: self.source,
            decoder: self.decoder,
            config: self.config,
            observer: self.observer.unwrap_or_else(|| Box::new(TracingObserver)),
            listeners: ListenerRegistry::new(),
            queue: EventQueue::new(),
            state: DispatchState::Idle,
        })
    }
}

/// The event dispatcher
///
/// Register listeners, then call [`run`](Self::run). `run` consumes the
/// dispatcher, so nothing can be registered once the loop has started.
pub struct Dispatcher<'a, S, D: Decoder> {
    source: S,
    decoder: D,
    config: DispatcherConfig,
    observer: Box<dyn DispatchObserver + 'a>,
    listeners: ListenerRegistry<'a, D::Event>,
    queue: EventQueue<D::Event>,
    state: DispatchState,
}

impl<'a, S, D> Dispatcher<'a, S, D>
where
    S: RecordSource,
    D: Decoder,
    S::Record: Borrow<D::Record>,
{
    /// Create a new dispatcher builder
    pub fn builder(source: S, decoder: D) -> DispatcherBuilder<'a, S, D> {
        DispatcherBuilder::new(source, decoder)
    }

    /// Create a dispatcher with the default configuration
    pub fn new(source: S, decoder: D) -> Self {
        Self {
            source,
            decoder,
            config: DispatcherConfig::default(),
            observer: Box::new(TracingObserver),
            listeners: ListenerRegistry::new(),
            queue: EventQueue::new(),
            state: DispatchState::Idle,
        }
    }

    /// Append a listener; notification order is registration order
    pub fn register(&mut self, listener: impl Listener<D::Event> + 'a) -> &mut Self {
        self.listeners.register(listener);
        self
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Run until the source is exhausted and the queue is empty
    ///
    /// Returns an error if the source fails, if a record fails to
    /// decode under [`DecodePolicy::Abort`], or if a record exceeds the
    /// cascade limit. Listener errors are reported to the observer and
    /// never end the run.
    pub fn run(mut self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::default();
        let emitter = self.queue.emitter();

        loop {
            let record = match self.source.next_record() {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(error) => {
                    self.observer.on_source_error(&error);
                    return Err(error.into());
                }
            };

            let index = summary.records_read;
            summary.records_read += 1;

            let record: &D::Record = record.borrow();
            match self.decoder.decode(record) {
                Ok(Some(event)) => self.queue.push_record(event, index),
                Ok(None) => {
                    summary.records_skipped += 1;
                    self.observer.on_skipped(index);
                    continue;
                }
                Err(error) => {
                    summary.decode_errors += 1;
                    self.observer.on_decode_error(index, &error);
                    match self.config.decode_policy {
                        DecodePolicy::Skip => continue,
                        DecodePolicy::Abort => {
                            return Err(PipelineError::Decode {
                                record: index,
                                source: error,
                            })
                        }
                    }
                }
            }

            self.transition(DispatchState::Draining);
            self.drain(index, &emitter, &mut summary)?;
            self.transition(DispatchState::Idle);
        }

        self.transition(DispatchState::Closed);
        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        self.observer.on_closed(&summary);

        Ok(summary)
    }

    /// Pop and notify until the queue is empty
    fn drain(
        &mut self,
        record: usize,
        emitter: &Emitter<D::Event>,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let mut processed = 0;

        while let Some(Pending { event, origin }) = self.queue.pop() {
            processed += 1;
            if let Some(limit) = self.config.cascade_limit {
                if processed > limit {
                    return Err(PipelineError::CascadeLimit { record, limit });
                }
            }

            match origin {
                Origin::Record(_) => summary.primary_events += 1,
                Origin::Emitted => summary.emitted_events += 1,
            }

            let code = event.code();
            let outcome = self.listeners.notify(&event, emitter);
            summary.notifications += outcome.delivered;

            for (listener, error) in &outcome.failures {
                summary.listener_errors += 1;
                self.observer.on_listener_error(listener, &code, error);
            }

            self.observer.on_dispatch(&code, origin, outcome.delivered);
        }

        Ok(())
    }

    fn transition(&mut self, to: DispatchState) {
        if self.state != to {
            self.observer.on_transition(self.state, to);
            self.state = to;
        }
    }
}
