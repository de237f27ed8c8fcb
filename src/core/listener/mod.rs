//! # Listener Module
//!
//! Listeners subscribe to event codes and react to matching events,
//! optionally emitting new events back into the pipeline.
//!
//! ## Notification rules
//! - Listeners are notified in registration order
//! - A listener only sees events whose code is in its [`InterestSet`]
//! - A failing listener does not stop the others

mod interest;

pub use interest::InterestSet;

use crate::error::ListenerError;
use crate::events::{Emitter, Event};
use std::marker::PhantomData;

/// Trait for event listeners
///
/// The [`Emitter`] handed to `process` is the only way a listener can
/// influence future dispatch.
pub trait Listener<E: Event> {
    /// Name used in logs and error reports
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Codes this listener wants to see
    fn interests(&self) -> &InterestSet;

    /// React to an event whose code is in [`interests`](Self::interests)
    fn process(&mut self, event: &E, emitter: &Emitter<E>) -> Result<(), ListenerError>;
}

impl<E: Event, L: Listener<E> + ?Sized> Listener<E> for &mut L {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn interests(&self) -> &InterestSet {
        (**self).interests()
    }

    fn process(&mut self, event: &E, emitter: &Emitter<E>) -> Result<(), ListenerError> {
        (**self).process(event, emitter)
    }
}

impl<E: Event, L: Listener<E> + ?Sized> Listener<E> for Box<L> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn interests(&self) -> &InterestSet {
        (**self).interests()
    }

    fn process(&mut self, event: &E, emitter: &Emitter<E>) -> Result<(), ListenerError> {
        (**self).process(event, emitter)
    }
}

/// A listener built from a closure
pub struct FnListener<E, F> {
    name: String,
    interests: InterestSet,
    process: F,
    _marker: PhantomData<fn(&E)>,
}

impl<E, F> FnListener<E, F>
where
    E: Event,
    F: FnMut(&E, &Emitter<E>) -> Result<(), ListenerError>,
{
    pub fn new(name: impl Into<String>, interests: InterestSet, process: F) -> Self {
        Self {
            name: name.into(),
            interests,
            process,
            _marker: PhantomData,
        }
    }
}

impl<E, F> Listener<E> for FnListener<E, F>
where
    E: Event,
    F: FnMut(&E, &Emitter<E>) -> Result<(), ListenerError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn interests(&self) -> &InterestSet {
        &self.interests
    }

    fn process(&mut self, event: &E, emitter: &Emitter<E>) -> Result<(), ListenerError> {
        (self.process)(event, emitter)
    }
}

/// Outcome of notifying every listener about one event
#[derive(Debug, Default)]
pub struct Notification {
    /// Listeners whose `process` was invoked
    pub delivered: usize,
    /// Listeners that returned an error, by name
    pub failures: Vec<(String, ListenerError)>,
}

/// Ordered list of registered listeners
///
/// No de-duplication and no priorities: the same listener registered
/// twice is notified twice.
pub struct ListenerRegistry<'a, E: Event> {
    listeners: Vec<Box<dyn Listener<E> + 'a>>,
}

impl<'a, E: Event> ListenerRegistry<'a, E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Append a listener; it will be notified after all earlier ones
    pub fn register(&mut self, listener: impl Listener<E> + 'a) {
        self.listeners.push(Box::new(listener));
    }

    /// Notify interested listeners, in registration order
    pub fn notify(&mut self, event: &E, emitter: &Emitter<E>) -> Notification {
        let code = event.code();
        let mut outcome = Notification::default();

        for listener in self.listeners.iter_mut() {
            if !listener.interests().contains(&code) {
                continue;
            }

            outcome.delivered += 1;
            if let Err(error) = listener.process(event, emitter) {
                outcome.failures.push((listener.name().to_string(), error));
            }
        }

        outcome
    }

    /// Listener names, in notification order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.listeners.iter().map(|l| l.name())
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E: Event> Default for ListenerRegistry<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}
