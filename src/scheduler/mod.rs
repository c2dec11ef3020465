// SPDX-License-Identifier: MPL-2.0
//! Delayed event scheduling on the host loop.
//!
//! The manager never blocks and never spawns threads. Every transition is a
//! [`ScheduledEvent`] posted onto the host loop, possibly with a delay, and
//! handed back to [`Manager::on_event`](crate::manager::Manager::on_event)
//! when it comes due. Events are dispatched one at a time in due order; ties
//! keep their post order.
//!
//! Two implementations are provided:
//!
//! - [`VirtualScheduler`] - deterministic virtual time, driven explicitly
//! - [`TokioScheduler`] - real timers on a tokio runtime

mod tokio_loop;
mod virtual_time;

pub use tokio_loop::TokioScheduler;
pub use virtual_time::VirtualScheduler;

use crate::crouton::CroutonId;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// A transition waiting on the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduledEvent {
    /// Attach the crouton view to its container.
    AddToView(CroutonId),
    /// The host finished laying out the freshly attached view.
    LayoutComplete(CroutonId),
    /// The enter animation has finished.
    Entered(CroutonId),
    /// The visible duration elapsed; start the exit.
    Remove(CroutonId),
    /// Look at the head of the queue again.
    Advance(CroutonId),
}

impl ScheduledEvent {
    /// The crouton this event refers to. Used for cancellation.
    #[must_use]
    pub fn target(&self) -> CroutonId {
        match *self {
            ScheduledEvent::AddToView(id)
            | ScheduledEvent::LayoutComplete(id)
            | ScheduledEvent::Entered(id)
            | ScheduledEvent::Remove(id)
            | ScheduledEvent::Advance(id) => id,
        }
    }
}

/// Cloneable poster for events raised by the host outside the manager,
/// such as layout completion.
#[derive(Clone)]
pub struct EventSink(Rc<dyn Fn(ScheduledEvent)>);

impl EventSink {
    pub fn new(post: impl Fn(ScheduledEvent) + 'static) -> Self {
        Self(Rc::new(post))
    }

    /// Posts the event for immediate dispatch.
    pub fn post(&self, event: ScheduledEvent) {
        (self.0)(event);
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventSink")
    }
}

/// Message-queue primitive of the host loop.
pub trait Scheduler {
    /// Time elapsed on the loop clock.
    fn now(&self) -> Duration;

    /// Posts an event to be dispatched after `delay`.
    fn post(&mut self, event: ScheduledEvent, delay: Duration);

    /// Posts an event for dispatch on the next loop turn.
    fn post_now(&mut self, event: ScheduledEvent) {
        self.post(event, Duration::ZERO);
    }

    /// Cancels every pending event targeting `crouton`.
    ///
    /// Implementations that hand events to a channel may still deliver ones
    /// already queued there; the manager ignores those by id and phase.
    fn cancel(&mut self, crouton: CroutonId);

    /// Cancels every pending event.
    fn cancel_all(&mut self);

    /// A poster the host can use to deliver events later.
    fn sink(&self) -> EventSink;
}
