// SPDX-License-Identifier: MPL-2.0
//! Display queue lifecycle.
//!
//! The [`Manager`] serializes croutons onto their host windows: only the
//! head of the queue is ever attached, and the next one is attached once the
//! previous exit animation has finished. Every timed transition goes through
//! the [`Scheduler`] as a [`ScheduledEvent`], which the host loop hands back
//! to [`Manager::on_event`].
//!
//! ```text
//! enqueue ──> Pending ──AddToView──> Entering ──Entered──> Visible
//!                                       │                     │
//!                                       └──────Remove─────────┤
//!                                                             v
//!                        Removed <──Advance (exit done)── Exiting
//! ```

use crate::config::{Settings, DEFAULT_ANIMATION_MS};
use crate::crouton::{Crouton, CroutonId, Phase};
use crate::diagnostics::{DiagnosticEventKind, DiagnosticsHandle};
use crate::host::{Insertion, LayoutListener, WindowId};
use crate::scheduler::{ScheduledEvent, Scheduler};
use log::{debug, trace};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// Queue of croutons waiting for, or occupying, the host surface.
pub struct Manager<S: Scheduler> {
    /// Display order. Only the head may be on screen.
    queue: VecDeque<Crouton>,
    /// Crouton whose exit animation is running.
    exiting: Option<Crouton>,
    scheduler: S,
    /// Duration of the built-in slide animations.
    animation_duration: Duration,
    diagnostics: Option<DiagnosticsHandle>,
}

impl<S: Scheduler> Manager<S> {
    #[must_use]
    pub fn new(scheduler: S) -> Self {
        Self {
            queue: VecDeque::new(),
            exiting: None,
            scheduler,
            animation_duration: Duration::from_millis(DEFAULT_ANIMATION_MS),
            diagnostics: None,
        }
    }

    /// Creates a manager using the timing section of `settings`.
    #[must_use]
    pub fn with_settings(scheduler: S, settings: &Settings) -> Self {
        let mut manager = Self::new(scheduler);
        manager.animation_duration = settings.timing.animation_duration();
        manager
    }

    /// Sets the diagnostics handle for reporting queue transitions.
    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Appends a crouton to the queue.
    ///
    /// If the queue was empty it is shown right away, or as soon as the
    /// previous crouton has finished exiting.
    pub fn enqueue(&mut self, crouton: Crouton) -> CroutonId {
        let id = crouton.id();
        let was_empty = self.queue.is_empty();
        self.queue.push_back(crouton);
        debug!("{id} enqueued, queue length {}", self.queue.len());
        self.report(DiagnosticEventKind::Enqueued {
            crouton: id.value(),
            queue_len: self.queue.len(),
        });
        if was_empty {
            self.advance();
        }
        id
    }

    /// Looks at the head of the queue and moves it forward.
    ///
    /// Heads whose window has died are dropped silently until a live one is
    /// found. A pending head gets attached; a head already on screen gets a
    /// new check scheduled after its full enter, display and exit cycle.
    /// Does nothing while a crouton is still exiting.
    pub fn advance(&mut self) {
        if let Some(exiting) = &self.exiting {
            trace!("advance deferred until {} has exited", exiting.id());
            return;
        }

        while let Some(head) = self.queue.front_mut() {
            let id = head.id();
            if !head.is_host_alive() {
                self.drop_dead_head();
                continue;
            }

            if head.phase() == Phase::Pending {
                trace!("{id} scheduled for attach");
                self.scheduler.post_now(ScheduledEvent::AddToView(id));
            } else if let Some(cycle) = head.cycle_duration(self.animation_duration) {
                trace!("{id} already on screen, checking again in {cycle:?}");
                self.scheduler.post(ScheduledEvent::Advance(id), cycle);
            }
            return;
        }
    }

    /// Dispatches a scheduled event. This is the single entry point for the
    /// host loop.
    ///
    /// Events for croutons that are no longer tracked, or that are not in
    /// the phase the event expects, are ignored.
    pub fn on_event(&mut self, event: ScheduledEvent) {
        trace!("dispatch {event:?}");
        match event {
            ScheduledEvent::AddToView(id) => self.begin_entering(id),
            ScheduledEvent::LayoutComplete(id) => self.on_layout_complete(id),
            ScheduledEvent::Entered(id) => self.mark_visible(id),
            ScheduledEvent::Remove(id) => self.remove(id),
            ScheduledEvent::Advance(id) => self.on_advance(id),
        }
    }

    /// Starts the exit of the crouton on screen.
    ///
    /// The crouton leaves the queue right away and `on_removed` fires; the
    /// view is detached when the exit animation completes, after which the
    /// next crouton is attached. Croutons that are not on screen are left
    /// alone. If the window died while the crouton was shown, it is dropped
    /// without animation or callbacks.
    pub fn remove(&mut self, id: CroutonId) {
        let on_screen = self
            .queue
            .front()
            .is_some_and(|head| head.id() == id && head.phase().is_on_screen());
        if !on_screen {
            trace!("remove of {id} ignored, not on screen");
            return;
        }
        if self.queue.front().is_some_and(|head| !head.is_host_alive()) {
            self.drop_dead_head();
            self.advance();
            return;
        }
        let Some(mut crouton) = self.queue.pop_front() else {
            return;
        };

        self.scheduler.cancel(id);
        let (_, exit) = crouton.animations(self.animation_duration);
        if let Some(view) = crouton.view() {
            if let Some(subscription) = crouton.take_layout_subscription() {
                view.remove_layout_listener(subscription);
            }
            view.start_animation(&exit);
        }
        crouton.set_phase(Phase::Exiting);
        crouton.fire_removed();
        crouton.release();
        debug!("{id} exiting, next in {:?}", exit.duration);
        self.report(DiagnosticEventKind::Removed {
            crouton: id.value(),
        });

        self.scheduler.post(ScheduledEvent::Advance(id), exit.duration);
        self.exiting = Some(crouton);
    }

    /// Withdraws a crouton without animation or callbacks.
    ///
    /// Pending events for it are cancelled. When it was the head, or was
    /// exiting, the next crouton is attached. Returns `false` if the crouton
    /// is not tracked.
    pub fn remove_immediately(&mut self, id: CroutonId) -> bool {
        self.scheduler.cancel(id);

        if self.exiting.as_ref().is_some_and(|c| c.id() == id) {
            if let Some(crouton) = self.exiting.take() {
                discard(crouton);
            }
        } else if let Some(index) = self.queue.iter().position(|c| c.id() == id) {
            if let Some(crouton) = self.queue.remove(index) {
                discard(crouton);
            }
            if index != 0 {
                debug!("{id} withdrawn from the queue");
                self.report(DiagnosticEventKind::Cancelled {
                    crouton: id.value(),
                });
                return true;
            }
        } else {
            trace!("remove_immediately of {id} ignored, not tracked");
            return false;
        }

        debug!("{id} withdrawn from screen");
        self.report(DiagnosticEventKind::Cancelled {
            crouton: id.value(),
        });
        self.advance();
        true
    }

    /// Cancels every pending event, detaches every view and empties the
    /// queue. No callbacks fire.
    pub fn clear_all(&mut self) {
        self.scheduler.cancel_all();
        let mut count = 0;
        for crouton in self.exiting.take().into_iter().chain(self.queue.drain(..)) {
            discard(crouton);
            count += 1;
        }
        debug!("cleared {count} croutons");
        self.report(DiagnosticEventKind::Cleared {
            window: None,
            count,
        });
    }

    /// Like [`clear_all`](Self::clear_all), restricted to the croutons of
    /// one window. Croutons of other windows keep their order.
    pub fn clear_for_host(&mut self, window: WindowId) {
        let head_before = self.queue.front().map(Crouton::id);
        let mut count = 0;

        let exiting_matches = self
            .exiting
            .as_ref()
            .is_some_and(|c| c.window_id() == window);
        if exiting_matches {
            if let Some(crouton) = self.exiting.take() {
                self.scheduler.cancel(crouton.id());
                discard(crouton);
                count += 1;
            }
        }

        let (cleared, kept): (VecDeque<_>, VecDeque<_>) = self
            .queue
            .drain(..)
            .partition(|c| c.window_id() == window);
        self.queue = kept;
        for crouton in cleared {
            self.scheduler.cancel(crouton.id());
            discard(crouton);
            count += 1;
        }

        debug!("cleared {count} croutons of window {}", window.0);
        self.report(DiagnosticEventKind::Cleared {
            window: Some(window.0),
            count,
        });

        if exiting_matches || self.queue.front().map(Crouton::id) != head_before {
            self.advance();
        }
    }

    /// Phase of a tracked crouton, `None` once it is gone.
    #[must_use]
    pub fn phase(&self, id: CroutonId) -> Option<Phase> {
        self.iter().find(|c| c.id() == id).map(Crouton::phase)
    }

    /// Phases of all tracked croutons, exiting one first, then queue order.
    #[must_use]
    pub fn phases(&self) -> Vec<(CroutonId, Phase)> {
        self.iter().map(|c| (c.id(), c.phase())).collect()
    }

    /// The crouton currently occupying the host surface, if any.
    #[must_use]
    pub fn on_screen(&self) -> Option<CroutonId> {
        self.iter()
            .find(|c| c.phase().is_on_screen())
            .map(Crouton::id)
    }

    /// Number of croutons in the queue, including the head on screen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether nothing is queued and nothing is exiting.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.exiting.is_none()
    }

    #[must_use]
    pub fn head(&self) -> Option<&Crouton> {
        self.queue.front()
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn iter(&self) -> impl Iterator<Item = &Crouton> {
        self.exiting.iter().chain(self.queue.iter())
    }

    fn report(&self, kind: DiagnosticEventKind) {
        if let Some(handle) = &self.diagnostics {
            handle.log(kind);
        }
    }

    fn drop_dead_head(&mut self) {
        let Some(crouton) = self.queue.pop_front() else {
            return;
        };
        let id = crouton.id();
        let window = crouton.window_id();
        self.scheduler.cancel(id);
        discard(crouton);
        debug!("{id} dropped, window {} is gone", window.0);
        self.report(DiagnosticEventKind::Dropped {
            crouton: id.value(),
            window: window.0,
        });
    }

    /// Attaches the head view and waits for its first layout pass.
    fn begin_entering(&mut self, id: CroutonId) {
        let Some(head) = self.queue.front_mut() else {
            return;
        };
        if head.id() != id || head.phase() != Phase::Pending {
            trace!("attach of {id} ignored, not the pending head");
            return;
        }
        if !head.is_host_alive() {
            self.advance();
            return;
        }
        let (Some(window), Some(view)) = (head.window().cloned(), head.view()) else {
            return;
        };
        if view.parent().is_some() {
            trace!("{id} already attached");
            return;
        }

        let mut params = view.layout_params().unwrap_or_default();
        let container = match head.container() {
            Some(container) => Rc::clone(container),
            None => {
                if let Some(inset) = window.chrome().top_inset() {
                    params.top_margin = inset;
                }
                window.content_root()
            }
        };
        let insertion = if container.supports_unpositioned_insert() {
            Insertion::Append
        } else {
            Insertion::At(0)
        };

        container.add_view(Rc::clone(&view), insertion, params);
        head.set_phase(Phase::Entering);
        view.request_layout();
        let subscription = view.on_next_layout(LayoutListener::new(id, self.scheduler.sink()));
        head.set_layout_subscription(subscription);
        debug!("{id} attached to container {}", container.id().0);
    }

    /// Starts the enter animation once the view has been laid out.
    fn on_layout_complete(&mut self, id: CroutonId) {
        let Some(head) = self.queue.front_mut() else {
            return;
        };
        if head.id() != id || head.phase() != Phase::Entering || !head.is_awaiting_layout() {
            trace!("layout of {id} ignored");
            return;
        }
        if !head.is_host_alive() {
            self.drop_dead_head();
            self.advance();
            return;
        }
        let Some(view) = head.view() else {
            return;
        };
        if let Some(subscription) = head.take_layout_subscription() {
            view.remove_layout_listener(subscription);
        }

        let (enter, _) = head.animations(self.animation_duration);
        view.start_animation(&enter);
        if let (Some(window), Some(text)) = (head.window(), head.text()) {
            if let Err(err) = window.announce(text) {
                debug!("{id} not announced: {err}");
            }
        }
        head.fire_displayed();

        self.scheduler.post(ScheduledEvent::Entered(id), enter.duration);
        match head.configuration().duration().as_duration() {
            Some(display) => {
                self.scheduler
                    .post(ScheduledEvent::Remove(id), enter.duration + display);
            }
            None => trace!("{id} stays until removed"),
        }
        debug!("{id} displayed");
        self.report(DiagnosticEventKind::Displayed {
            crouton: id.value(),
        });
    }

    fn mark_visible(&mut self, id: CroutonId) {
        match self.queue.front_mut() {
            Some(head) if head.id() == id && head.phase() == Phase::Entering => {
                head.set_phase(Phase::Visible);
                trace!("{id} visible");
            }
            _ => trace!("enter completion of {id} ignored"),
        }
    }

    fn on_advance(&mut self, id: CroutonId) {
        if self.exiting.as_ref().is_some_and(|c| c.id() == id) {
            if let Some(crouton) = self.exiting.take() {
                discard(crouton);
                debug!("{id} removed");
            }
            self.advance();
        } else if self.queue.front().is_some_and(|head| head.id() == id) {
            self.advance();
        } else {
            trace!("advance for {id} ignored");
        }
    }
}

impl<S: Scheduler + Default> Default for Manager<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Scheduler + std::fmt::Debug> std::fmt::Debug for Manager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("queue", &self.queue)
            .field("exiting", &self.exiting)
            .field("scheduler", &self.scheduler)
            .field("animation_duration", &self.animation_duration)
            .finish_non_exhaustive()
    }
}

/// Takes a crouton off the host surface and drops its host references.
fn discard(mut crouton: Crouton) {
    crouton.detach_view();
    crouton.release();
    crouton.set_phase(Phase::Removed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crouton::{Configuration, LifecycleCallback, Style};
    use crate::diagnostics::{BufferCapacity, DiagnosticsCollector};
    use crate::host::memory::{HostOp, MemoryHost, MemoryWindow};
    use crate::host::{Chrome, Container, HostWindow};
    use crate::scheduler::VirtualScheduler;
    use std::cell::RefCell;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn manager() -> Manager<VirtualScheduler> {
        Manager::new(VirtualScheduler::new())
    }

    fn text(window: &Rc<MemoryWindow>, label: &str, millis: u64) -> Crouton {
        Crouton::make_text(window.clone(), label, Style::info())
            .with_configuration(Configuration::builder().duration_millis(millis).build())
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<&'static str>>>);

    impl LifecycleCallback for Recorder {
        fn on_displayed(&self) {
            self.0.borrow_mut().push("displayed");
        }

        fn on_removed(&self) {
            self.0.borrow_mut().push("removed");
        }
    }

    #[test]
    fn new_manager_is_idle() {
        let manager = manager();
        assert!(manager.is_idle());
        assert!(manager.is_empty());
        assert!(manager.head().is_none());
    }

    #[test]
    fn enqueue_on_empty_queue_schedules_attach() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();

        let id = manager.enqueue(text(&window, "a", 1000));

        assert_eq!(
            manager.scheduler().pending(),
            vec![(Duration::ZERO, ScheduledEvent::AddToView(id))]
        );
        assert_eq!(manager.phase(id), Some(Phase::Pending));
    }

    #[test]
    fn second_enqueue_does_not_schedule_anything() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();

        manager.enqueue(text(&window, "a", 1000));
        let b = manager.enqueue(text(&window, "b", 1000));

        assert_eq!(manager.scheduler().pending_for(b), 0);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn full_cycle_runs_through_every_phase() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        let id = manager.enqueue(text(&window, "a", 1000));

        manager.run_until(ms(0));
        assert_eq!(manager.phase(id), Some(Phase::Entering));
        manager.run_until(ms(400));
        assert_eq!(manager.phase(id), Some(Phase::Visible));
        manager.run_until(ms(1400));
        assert_eq!(manager.phase(id), Some(Phase::Exiting));
        manager.run_until(ms(1800));
        assert_eq!(manager.phase(id), None);
        assert!(manager.is_idle());
        assert!(host.attached_views().is_empty());
    }

    #[test]
    fn attach_uses_window_root_and_announces_text() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        manager.enqueue(text(&window, "hello", 1000));

        manager.run_until(ms(0));

        let journal = host.journal();
        assert!(journal.iter().any(|op| matches!(
            op,
            HostOp::Attached { container, insertion: Insertion::Append, .. }
                if *container == window.root().id()
        )));
        assert!(journal.contains(&HostOp::Announced("hello".to_string())));
        assert!(journal
            .iter()
            .any(|op| matches!(op, HostOp::Animated { .. })));
    }

    #[test]
    fn overlaying_action_bar_sets_top_margin() {
        let host = MemoryHost::new();
        let window = host.window();
        window.set_chrome(Chrome {
            action_bar_overlay: true,
            action_bar_bottom: Some(56),
            ..Chrome::default()
        });
        let mut manager = manager();
        manager.enqueue(text(&window, "a", 1000));

        manager.run_until(ms(0));

        assert!(host.journal().iter().any(|op| matches!(
            op,
            HostOp::Attached { params, .. } if params.top_margin == 56
        )));
    }

    #[test]
    fn linear_container_gets_crouton_at_index_zero() {
        let host = MemoryHost::new();
        let window = host.window();
        let container = host.container(false);
        let mut manager = manager();
        let crouton = Crouton::make_text_in(window, "a", Style::alert(), container.clone());
        manager.enqueue(crouton);

        manager.run_until(ms(0));

        assert!(host.journal().iter().any(|op| matches!(
            op,
            HostOp::Attached { container: c, insertion: Insertion::At(0), params, .. }
                if *c == container.id() && params.top_margin == 0
        )));
        assert_eq!(container.children().len(), 1);
    }

    #[test]
    fn enter_waits_for_layout_pass() {
        let host = MemoryHost::new();
        host.set_auto_layout(false);
        let window = host.window();
        let recorder = Recorder::default();
        let mut manager = manager();
        let id = manager.enqueue(text(&window, "a", 1000).with_lifecycle_callback(recorder.clone()));

        manager.run_until(ms(100));
        assert_eq!(manager.phase(id), Some(Phase::Entering));
        assert!(recorder.0.borrow().is_empty());

        host.run_layout_pass();
        manager.dispatch_due();
        assert_eq!(*recorder.0.borrow(), vec!["displayed"]);

        manager.run_until(ms(500));
        assert_eq!(manager.phase(id), Some(Phase::Visible));
        manager.run_until(ms(1500));
        assert_eq!(manager.phase(id), Some(Phase::Exiting));
    }

    #[test]
    fn window_dying_before_layout_drops_crouton_silently() {
        let host = MemoryHost::new();
        host.set_auto_layout(false);
        let window = host.window();
        let other = host.window();
        let recorder = Recorder::default();
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000).with_lifecycle_callback(recorder.clone()));
        let b = manager.enqueue(text(&other, "b", 1000));

        manager.run_until(ms(100));
        assert_eq!(manager.phase(a), Some(Phase::Entering));
        window.destroy();
        host.take_journal();

        host.run_layout_pass();
        manager.run_until(ms(200));

        assert_eq!(manager.phase(a), None);
        assert_eq!(manager.phase(b), Some(Phase::Entering));
        assert!(recorder.0.borrow().is_empty());
        assert!(!host
            .journal()
            .iter()
            .any(|op| matches!(op, HostOp::Animated { .. } | HostOp::Announced(_))));
    }

    #[test]
    fn window_dying_while_visible_skips_exit() {
        let host = MemoryHost::new();
        let window = host.window();
        let recorder = Recorder::default();
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000).with_lifecycle_callback(recorder.clone()));

        manager.run_until(ms(500));
        assert_eq!(manager.phase(a), Some(Phase::Visible));
        window.destroy();
        host.take_journal();

        manager.run_until(ms(1400));

        assert_eq!(manager.phase(a), None);
        assert!(manager.is_idle());
        assert_eq!(*recorder.0.borrow(), vec!["displayed"]);
        assert!(host.attached_views().is_empty());
        assert!(!host
            .journal()
            .iter()
            .any(|op| matches!(op, HostOp::Animated { .. })));
    }

    #[test]
    fn withdrawing_queued_crouton_keeps_shared_view_on_screen() {
        let host = MemoryHost::new();
        let window = host.window();
        let other = host.window();
        let shared = host.view(40);
        let mut manager = manager();
        let a = manager.enqueue(
            Crouton::make(window.clone(), shared.clone())
                .with_configuration(Configuration::builder().duration_millis(1000).build()),
        );
        let b = manager.enqueue(Crouton::make(window.clone(), shared.clone()));
        let c = manager.enqueue(Crouton::make(other.clone(), shared));

        manager.run_until(ms(500));
        assert_eq!(manager.phase(a), Some(Phase::Visible));
        assert_eq!(host.attached_views().len(), 1);

        assert!(manager.remove_immediately(b));
        manager.clear_for_host(other.id());

        assert_eq!(manager.phase(c), None);
        assert_eq!(manager.phase(a), Some(Phase::Visible));
        assert_eq!(host.attached_views().len(), 1);
    }

    #[test]
    fn lifecycle_callbacks_fire_once_each() {
        let host = MemoryHost::new();
        let window = host.window();
        let recorder = Recorder::default();
        let mut manager = manager();
        manager.enqueue(text(&window, "a", 500).with_lifecycle_callback(recorder.clone()));

        manager.run_until_idle(ms(10_000));

        assert_eq!(*recorder.0.borrow(), vec!["displayed", "removed"]);
    }

    #[test]
    fn infinite_crouton_never_exits_on_its_own() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        let id = manager.enqueue(
            Crouton::make_text(window, "stay", Style::info())
                .with_configuration(Configuration::infinite()),
        );

        manager.run_until(ms(60_000));

        assert_eq!(manager.phase(id), Some(Phase::Visible));
        assert!(manager.scheduler().is_empty());
    }

    #[test]
    fn remove_of_pending_crouton_is_ignored() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        manager.enqueue(text(&window, "a", 1000));
        let b = manager.enqueue(text(&window, "b", 1000));

        manager.run_until(ms(0));
        manager.remove(b);

        assert_eq!(manager.phase(b), Some(Phase::Pending));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn advance_while_exiting_is_deferred() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000));
        let b = manager.enqueue(text(&window, "b", 1000));

        manager.run_until(ms(1400));
        assert_eq!(manager.phase(a), Some(Phase::Exiting));

        manager.advance();
        manager.dispatch_due();
        assert_eq!(manager.phase(b), Some(Phase::Pending));
    }

    #[test]
    fn advance_on_visible_head_reschedules_check() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000));
        manager.run_until(ms(500));

        manager.advance();

        assert!(manager
            .scheduler()
            .pending()
            .contains(&(ms(500 + 1800), ScheduledEvent::Advance(a))));
    }

    #[test]
    fn duplicate_attach_is_ignored() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000));

        manager.on_event(ScheduledEvent::AddToView(a));
        manager.on_event(ScheduledEvent::AddToView(a));

        let attached = host
            .journal()
            .iter()
            .filter(|op| matches!(op, HostOp::Attached { .. }))
            .count();
        assert_eq!(attached, 1);
    }

    #[test]
    fn stale_events_are_ignored() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000));
        manager.run_until_idle(ms(10_000));

        manager.on_event(ScheduledEvent::LayoutComplete(a));
        manager.on_event(ScheduledEvent::Entered(a));
        manager.on_event(ScheduledEvent::Remove(a));
        manager.on_event(ScheduledEvent::Advance(a));

        assert!(manager.is_idle());
        assert!(manager.scheduler().is_empty());
    }

    #[test]
    fn remove_immediately_of_head_attaches_next() {
        let host = MemoryHost::new();
        let window = host.window();
        let recorder = Recorder::default();
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000).with_lifecycle_callback(recorder.clone()));
        let b = manager.enqueue(text(&window, "b", 1000));
        manager.run_until(ms(500));

        assert!(manager.remove_immediately(a));
        manager.dispatch_due();

        assert_eq!(manager.phase(a), None);
        assert_eq!(manager.phase(b), Some(Phase::Entering));
        assert_eq!(manager.scheduler().pending_for(a), 0);
        assert_eq!(*recorder.0.borrow(), vec!["displayed"]);
        assert_eq!(host.attached_views().len(), 1);
    }

    #[test]
    fn remove_immediately_of_queued_crouton_keeps_head() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000));
        let b = manager.enqueue(text(&window, "b", 1000));
        let c = manager.enqueue(text(&window, "c", 1000));
        manager.run_until(ms(500));

        assert!(manager.remove_immediately(b));

        assert_eq!(
            manager.phases(),
            vec![(a, Phase::Visible), (c, Phase::Pending)]
        );
    }

    #[test]
    fn remove_immediately_of_unknown_crouton_returns_false() {
        let mut manager = manager();
        assert!(!manager.remove_immediately(CroutonId::new()));
    }

    #[test]
    fn remove_immediately_while_exiting_attaches_next_early() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000));
        let b = manager.enqueue(text(&window, "b", 1000));
        manager.run_until(ms(1400));

        assert!(manager.remove_immediately(a));
        manager.dispatch_due();

        assert_eq!(manager.phase(b), Some(Phase::Entering));
        assert_eq!(manager.on_screen(), Some(b));
    }

    #[test]
    fn clear_all_detaches_everything_without_callbacks() {
        let host = MemoryHost::new();
        let window = host.window();
        let recorder = Recorder::default();
        let mut manager = manager();
        manager.enqueue(text(&window, "a", 1000).with_lifecycle_callback(recorder.clone()));
        manager.enqueue(text(&window, "b", 1000));
        manager.run_until(ms(0));
        recorder.0.borrow_mut().clear();

        manager.clear_all();

        assert!(manager.is_idle());
        assert!(manager.scheduler().is_empty());
        assert!(host.attached_views().is_empty());
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn clear_for_host_keeps_other_windows_in_order() {
        let host = MemoryHost::new();
        let (w1, w2) = (host.window(), host.window());
        let mut manager = manager();
        let a = manager.enqueue(text(&w1, "a", 1000));
        let b = manager.enqueue(text(&w2, "b", 1000));
        let c = manager.enqueue(text(&w1, "c", 1000));
        let d = manager.enqueue(text(&w2, "d", 1000));
        manager.run_until(ms(100));

        manager.clear_for_host(w1.id());
        manager.dispatch_due();

        assert_eq!(manager.phase(a), None);
        assert_eq!(manager.phase(c), None);
        assert_eq!(
            manager.phases(),
            vec![(b, Phase::Entering), (d, Phase::Pending)]
        );
    }

    #[test]
    fn clear_for_host_of_exiting_crouton_attaches_next() {
        let host = MemoryHost::new();
        let (w1, w2) = (host.window(), host.window());
        let mut manager = manager();
        let a = manager.enqueue(text(&w1, "a", 1000));
        let b = manager.enqueue(text(&w2, "b", 1000));
        manager.run_until(ms(1500));
        assert_eq!(manager.phase(a), Some(Phase::Exiting));

        manager.clear_for_host(w1.id());
        manager.dispatch_due();

        assert_eq!(manager.phase(a), None);
        assert_eq!(manager.phase(b), Some(Phase::Entering));
    }

    #[test]
    fn dead_window_head_is_dropped_silently() {
        let host = MemoryHost::new();
        let (dead, live) = (host.window(), host.window());
        let mut manager = manager();
        dead.destroy();

        let a = manager.enqueue(text(&dead, "a", 1000));
        let b = manager.enqueue(text(&live, "b", 1000));

        assert_eq!(manager.phase(a), None);
        manager.run_until(ms(0));
        assert_eq!(manager.phase(b), Some(Phase::Entering));
        assert!(!host
            .journal()
            .iter()
            .any(|op| matches!(op, HostOp::Announced(t) if t == "a")));
    }

    #[test]
    fn failed_announcement_does_not_stop_display() {
        let host = MemoryHost::new();
        let window = host.window();
        window.set_accessibility_enabled(false);
        let mut manager = manager();
        let a = manager.enqueue(text(&window, "a", 1000));

        manager.run_until(ms(400));

        assert_eq!(manager.phase(a), Some(Phase::Visible));
    }

    #[test]
    fn with_settings_uses_animation_duration() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut settings = Settings::default();
        settings.timing.animation_ms = 100;
        let mut manager = Manager::with_settings(VirtualScheduler::new(), &settings);
        let a = manager.enqueue(text(&window, "a", 1000));

        manager.run_until(ms(100));
        assert_eq!(manager.phase(a), Some(Phase::Visible));
        manager.run_until(ms(1100));
        assert_eq!(manager.phase(a), Some(Phase::Exiting));
        manager.run_until(ms(1200));
        assert_eq!(manager.phase(a), None);
    }

    #[test]
    fn diagnostics_receive_queue_transitions() {
        let host = MemoryHost::new();
        let window = host.window();
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let mut manager = manager();
        manager.set_diagnostics(collector.handle());

        let a = manager.enqueue(text(&window, "a", 500));
        manager.run_until_idle(ms(10_000));
        collector.process_pending();

        let raw = a.value();
        assert_eq!(
            collector.kinds(),
            vec![
                DiagnosticEventKind::Enqueued {
                    crouton: raw,
                    queue_len: 1
                },
                DiagnosticEventKind::Displayed { crouton: raw },
                DiagnosticEventKind::Removed { crouton: raw },
            ]
        );
    }
}
