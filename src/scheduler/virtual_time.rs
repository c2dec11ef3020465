// SPDX-License-Identifier: MPL-2.0
//! Deterministic scheduler driven by a virtual clock.
//!
//! Nothing happens until the owner advances the clock. This is what the
//! tests use to check exact timelines, and it doubles as a loop for hosts
//! that tick the manager from their own frame callback.

use super::{EventSink, ScheduledEvent, Scheduler};
use crate::crouton::CroutonId;
use crate::manager::Manager;
use std::cell::RefCell;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    due: Duration,
    seq: u64,
    event: ScheduledEvent,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
struct Queue {
    now: Duration,
    next_seq: u64,
    entries: BinaryHeap<Reverse<Entry>>,
}

impl Queue {
    fn push(&mut self, event: ScheduledEvent, delay: Duration) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.next_seq,
            event,
        };
        self.next_seq += 1;
        self.entries.push(Reverse(entry));
    }
}

/// Scheduler over a virtual clock.
///
/// Clones share the same queue, so the host side can hold one to inspect
/// pending events while the manager owns another.
#[derive(Debug, Clone, Default)]
pub struct VirtualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl VirtualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the earliest event that is due at the current time.
    pub fn pop_due(&self) -> Option<ScheduledEvent> {
        let mut queue = self.queue.borrow_mut();
        let now = queue.now;
        let is_due = queue
            .entries
            .peek()
            .is_some_and(|Reverse(entry)| entry.due <= now);
        if is_due {
            queue.entries.pop().map(|Reverse(entry)| entry.event)
        } else {
            None
        }
    }

    /// Due time of the earliest pending event.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .borrow()
            .entries
            .peek()
            .map(|Reverse(entry)| entry.due)
    }

    /// Moves the clock forward to `time`. Moving backwards is ignored.
    pub fn set_time(&self, time: Duration) {
        let mut queue = self.queue.borrow_mut();
        queue.now = queue.now.max(time);
    }

    /// Pending events with their due times, earliest first.
    #[must_use]
    pub fn pending(&self) -> Vec<(Duration, ScheduledEvent)> {
        let queue = self.queue.borrow();
        let mut entries: Vec<Entry> = queue.entries.iter().map(|Reverse(e)| *e).collect();
        entries.sort();
        entries.into_iter().map(|e| (e.due, e.event)).collect()
    }

    /// Number of pending events targeting `crouton`.
    #[must_use]
    pub fn pending_for(&self, crouton: CroutonId) -> usize {
        self.queue
            .borrow()
            .entries
            .iter()
            .filter(|Reverse(entry)| entry.event.target() == crouton)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().entries.is_empty()
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    fn post(&mut self, event: ScheduledEvent, delay: Duration) {
        self.queue.borrow_mut().push(event, delay);
    }

    fn cancel(&mut self, crouton: CroutonId) {
        self.queue
            .borrow_mut()
            .entries
            .retain(|Reverse(entry)| entry.event.target() != crouton);
    }

    fn cancel_all(&mut self) {
        self.queue.borrow_mut().entries.clear();
    }

    fn sink(&self) -> EventSink {
        let queue = Rc::clone(&self.queue);
        EventSink::new(move |event| queue.borrow_mut().push(event, Duration::ZERO))
    }
}

impl Manager<VirtualScheduler> {
    /// Dispatches every event that is due at the current virtual time.
    ///
    /// Returns the number of dispatched events.
    pub fn dispatch_due(&mut self) -> usize {
        let mut dispatched = 0;
        while let Some(event) = self.scheduler().pop_due() {
            self.on_event(event);
            dispatched += 1;
        }
        dispatched
    }

    /// Runs the loop up to and including `time`, dispatching events in due
    /// order and stopping the clock at each due time on the way.
    pub fn run_until(&mut self, time: Duration) {
        loop {
            self.dispatch_due();
            match self.scheduler().next_due() {
                Some(due) if due <= time => self.scheduler().set_time(due),
                _ => break,
            }
        }
        self.scheduler().set_time(time);
        self.dispatch_due();
    }

    /// Runs the loop for `duration` from the current time.
    pub fn run_for(&mut self, duration: Duration) {
        let target = self.scheduler().now() + duration;
        self.run_until(target);
    }

    /// Runs until no event is pending or `limit` is reached.
    ///
    /// Returns the virtual time at which the loop went idle.
    pub fn run_until_idle(&mut self, limit: Duration) -> Duration {
        loop {
            self.dispatch_due();
            match self.scheduler().next_due() {
                Some(due) if due <= limit => self.scheduler().set_time(due),
                _ => break,
            }
        }
        self.scheduler().now()
    }
}
