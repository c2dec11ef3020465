// SPDX-License-Identifier: MPL-2.0
//! Scheduler backed by tokio timers.
//!
//! Each delayed post spawns a sleeping task that forwards the event into an
//! unbounded channel. The host loop receives from that channel and hands
//! every event to the manager, so dispatch stays on a single task.

use super::{EventSink, ScheduledEvent, Scheduler};
use crate::crouton::CroutonId;
use crate::manager::Manager;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Scheduler posting events through tokio timers.
///
/// Must be used from within a tokio runtime with the time driver enabled.
#[derive(Debug)]
pub struct TokioScheduler {
    event_tx: UnboundedSender<ScheduledEvent>,
    timers: HashMap<CroutonId, Vec<JoinHandle<()>>>,
    started_at: Instant,
}

impl TokioScheduler {
    /// Creates the scheduler and the receiving end of its event channel.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<ScheduledEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            event_tx,
            timers: HashMap::new(),
            started_at: Instant::now(),
        };
        (scheduler, event_rx)
    }

    /// Number of timers still running.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.timers
            .values()
            .flatten()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    fn prune_finished(&mut self) {
        self.timers.retain(|_, handles| {
            handles.retain(|handle| !handle.is_finished());
            !handles.is_empty()
        });
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn post(&mut self, event: ScheduledEvent, delay: Duration) {
        self.prune_finished();
        if delay.is_zero() {
            // The receiver may already be gone during shutdown.
            let _ = self.event_tx.send(event);
            return;
        }
        let event_tx = self.event_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = event_tx.send(event);
        });
        self.timers.entry(event.target()).or_default().push(handle);
    }

    /// Aborts the timers still sleeping for `crouton`. Zero-delay posts and
    /// timers that already fired sit in the channel and are delivered anyway.
    fn cancel(&mut self, crouton: CroutonId) {
        if let Some(handles) = self.timers.remove(&crouton) {
            for handle in handles {
                handle.abort();
            }
        }
    }

    fn cancel_all(&mut self) {
        for handle in self.timers.drain().flat_map(|(_, handles)| handles) {
            handle.abort();
        }
    }

    fn sink(&self) -> EventSink {
        let event_tx = self.event_tx.clone();
        EventSink::new(move |event| {
            let _ = event_tx.send(event);
        })
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl Manager<TokioScheduler> {
    /// Feeds events from `event_rx` to the manager until the queue is idle.
    ///
    /// Events already cancelled but delivered anyway are ignored by the
    /// manager, so late timers are harmless.
    pub async fn drive_until_idle(&mut self, event_rx: &mut UnboundedReceiver<ScheduledEvent>) {
        while !self.is_idle() {
            match event_rx.recv().await {
                Some(event) => self.on_event(event),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delayed_events_arrive_in_order() {
        let (mut scheduler, mut event_rx) = TokioScheduler::new();
        let (a, b) = (CroutonId::new(), CroutonId::new());

        scheduler.post(ScheduledEvent::Remove(a), Duration::from_millis(300));
        scheduler.post(ScheduledEvent::Remove(b), Duration::from_millis(100));

        assert_eq!(event_rx.recv().await, Some(ScheduledEvent::Remove(b)));
        assert_eq!(event_rx.recv().await, Some(ScheduledEvent::Remove(a)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_events_never_arrive() {
        let (mut scheduler, mut event_rx) = TokioScheduler::new();
        let (a, b) = (CroutonId::new(), CroutonId::new());

        scheduler.post(ScheduledEvent::Remove(a), Duration::from_millis(100));
        scheduler.post(ScheduledEvent::Remove(b), Duration::from_millis(200));
        scheduler.cancel(a);

        assert_eq!(event_rx.recv().await, Some(ScheduledEvent::Remove(b)));
        assert!(event_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn post_now_is_delivered_immediately() {
        let (mut scheduler, mut event_rx) = TokioScheduler::new();
        let id = CroutonId::new();

        scheduler.post_now(ScheduledEvent::AddToView(id));

        assert_eq!(event_rx.try_recv(), Ok(ScheduledEvent::AddToView(id)));
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_does_not_withdraw_events_already_sent() {
        let (mut scheduler, mut event_rx) = TokioScheduler::new();
        let id = CroutonId::new();

        scheduler.post_now(ScheduledEvent::AddToView(id));
        scheduler.post(ScheduledEvent::Remove(id), Duration::from_millis(100));
        scheduler.cancel(id);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(event_rx.try_recv(), Ok(ScheduledEvent::AddToView(id)));
        assert!(event_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_aborts_every_timer() {
        let (mut scheduler, _event_rx) = TokioScheduler::new();
        scheduler.post(ScheduledEvent::Remove(CroutonId::new()), Duration::from_secs(1));
        scheduler.post(ScheduledEvent::Remove(CroutonId::new()), Duration::from_secs(2));

        scheduler.cancel_all();
        tokio::task::yield_now().await;

        assert_eq!(scheduler.active_timers(), 0);
    }
}
