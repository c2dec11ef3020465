// SPDX-License-Identifier: MPL-2.0
//! In-memory host surface.
//!
//! Implements every host trait on plain data structures and records each
//! operation in a shared journal. The tests inspect that journal; the demo
//! binary prints it.
//!
//! By default layout completes as soon as a listener is registered. Call
//! [`MemoryHost::set_auto_layout`] with `false` to hold layout passes back
//! until [`MemoryHost::run_layout_pass`] is called.

use super::{
    AnnounceError, Chrome, ClickHandler, Container, ContainerId, HostWindow, Insertion,
    LayoutListener, LayoutParams, LayoutSubscription, View, ViewId, WindowId,
};
use crate::crouton::{Animation, AnimationId, AnimationKind, Style};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Operation recorded by the in-memory host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    Attached {
        view: ViewId,
        container: ContainerId,
        insertion: Insertion,
        params: LayoutParams,
    },
    Detached {
        view: ViewId,
        container: ContainerId,
    },
    LayoutRequested(ViewId),
    Animated {
        view: ViewId,
        animation: AnimationKind,
    },
    Announced(String),
}

#[derive(Default)]
struct Tree {
    next_id: Cell<u64>,
    parents: RefCell<HashMap<ViewId, Weak<MemoryContainer>>>,
    listeners: RefCell<Vec<(ViewId, LayoutSubscription, LayoutListener)>>,
    journal: RefCell<Vec<HostOp>>,
    manual_layout: Cell<bool>,
    view_height: Cell<u32>,
}

impl Tree {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn record(&self, op: HostOp) {
        self.journal.borrow_mut().push(op);
    }
}

/// Factory and journal for in-memory windows, containers and views.
#[derive(Clone)]
pub struct MemoryHost {
    tree: Rc<Tree>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        let tree = Tree::default();
        tree.view_height.set(48);
        Self {
            tree: Rc::new(tree),
        }
    }

    /// Creates a live window with its own stacking content root.
    #[must_use]
    pub fn window(&self) -> Rc<MemoryWindow> {
        Rc::new(MemoryWindow {
            id: WindowId(self.tree.next_id()),
            root: self.container(true),
            tree: Rc::clone(&self.tree),
            alive: Cell::new(true),
            chrome: Cell::new(Chrome::default()),
            animations: RefCell::new(HashMap::new()),
            accessibility: Cell::new(true),
            inflated: RefCell::new(Vec::new()),
        })
    }

    /// Creates a container. `stacking` containers accept unpositioned inserts.
    #[must_use]
    pub fn container(&self, stacking: bool) -> Rc<MemoryContainer> {
        let id = ContainerId(self.tree.next_id());
        let tree = Rc::clone(&self.tree);
        Rc::new_cyclic(|this| MemoryContainer {
            id,
            stacking,
            this: this.clone(),
            tree,
            children: RefCell::new(Vec::new()),
        })
    }

    /// Creates a standalone view, as used for custom crouton content.
    #[must_use]
    pub fn view(&self, height: u32) -> Rc<MemoryView> {
        Rc::new(MemoryView {
            id: ViewId(self.tree.next_id()),
            tree: Rc::clone(&self.tree),
            height,
            text: None,
            on_click: None,
            params: None,
        })
    }

    /// Measured height given to views inflated from now on.
    pub fn set_view_height(&self, height: u32) {
        self.tree.view_height.set(height);
    }

    /// Whether layout completes as soon as a listener is registered.
    pub fn set_auto_layout(&self, enabled: bool) {
        self.tree.manual_layout.set(!enabled);
    }

    /// Completes the pending layout pass of every view.
    ///
    /// Returns how many listeners were notified.
    pub fn run_layout_pass(&self) -> usize {
        let listeners: Vec<_> = self.tree.listeners.borrow_mut().drain(..).collect();
        let count = listeners.len();
        for (_, _, listener) in listeners {
            listener.notify();
        }
        count
    }

    /// Number of layout listeners still registered.
    #[must_use]
    pub fn pending_layout_listeners(&self) -> usize {
        self.tree.listeners.borrow().len()
    }

    /// Every recorded operation, oldest first.
    #[must_use]
    pub fn journal(&self) -> Vec<HostOp> {
        self.tree.journal.borrow().clone()
    }

    /// Drains the journal.
    pub fn take_journal(&self) -> Vec<HostOp> {
        std::mem::take(&mut *self.tree.journal.borrow_mut())
    }

    /// Views currently attached to any container.
    #[must_use]
    pub fn attached_views(&self) -> Vec<ViewId> {
        let mut views: Vec<ViewId> = self
            .tree
            .parents
            .borrow()
            .iter()
            .filter(|(_, parent)| parent.strong_count() > 0)
            .map(|(view, _)| *view)
            .collect();
        views.sort();
        views
    }
}

/// In-memory host window.
pub struct MemoryWindow {
    id: WindowId,
    root: Rc<MemoryContainer>,
    tree: Rc<Tree>,
    alive: Cell<bool>,
    chrome: Cell<Chrome>,
    animations: RefCell<HashMap<AnimationId, Animation>>,
    accessibility: Cell<bool>,
    inflated: RefCell<Vec<Rc<MemoryView>>>,
}

impl MemoryWindow {
    /// Marks the window as destroyed.
    pub fn destroy(&self) {
        self.alive.set(false);
    }

    pub fn set_chrome(&self, chrome: Chrome) {
        self.chrome.set(chrome);
    }

    /// Makes an animation resource available under `id`.
    pub fn register_animation(&self, id: AnimationId, duration: Duration) {
        self.animations
            .borrow_mut()
            .insert(id, Animation::new(AnimationKind::Resource(id), duration));
    }

    /// Whether accessibility announcements succeed.
    pub fn set_accessibility_enabled(&self, enabled: bool) {
        self.accessibility.set(enabled);
    }

    #[must_use]
    pub fn root(&self) -> &Rc<MemoryContainer> {
        &self.root
    }

    /// Views inflated by this window, oldest first.
    #[must_use]
    pub fn inflated(&self) -> Vec<Rc<MemoryView>> {
        self.inflated.borrow().clone()
    }
}

impl HostWindow for MemoryWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn content_root(&self) -> Rc<dyn Container> {
        self.root.clone()
    }

    fn chrome(&self) -> Chrome {
        self.chrome.get()
    }

    fn inflate(&self, text: &str, style: &Style, on_click: Option<ClickHandler>) -> Rc<dyn View> {
        let view = Rc::new(MemoryView {
            id: ViewId(self.tree.next_id()),
            tree: Rc::clone(&self.tree),
            height: self.tree.view_height.get(),
            text: Some(text.to_string()),
            on_click,
            params: Some(LayoutParams {
                width: style.width,
                height: style.height,
                top_margin: 0,
            }),
        });
        self.inflated.borrow_mut().push(Rc::clone(&view));
        view
    }

    fn load_animation(&self, id: AnimationId) -> Option<Animation> {
        self.animations.borrow().get(&id).copied()
    }

    fn announce(&self, text: &str) -> Result<(), AnnounceError> {
        if !self.accessibility.get() {
            return Err(AnnounceError("accessibility service disabled".to_string()));
        }
        self.tree.record(HostOp::Announced(text.to_string()));
        Ok(())
    }
}

/// In-memory view container.
pub struct MemoryContainer {
    id: ContainerId,
    stacking: bool,
    this: Weak<MemoryContainer>,
    tree: Rc<Tree>,
    children: RefCell<Vec<ViewId>>,
}

impl MemoryContainer {
    /// Child views in z-order, bottom first.
    #[must_use]
    pub fn children(&self) -> Vec<ViewId> {
        self.children.borrow().clone()
    }
}

impl Container for MemoryContainer {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn supports_unpositioned_insert(&self) -> bool {
        self.stacking
    }

    fn add_view(&self, view: Rc<dyn View>, insertion: Insertion, params: LayoutParams) {
        let view_id = view.id();
        {
            let mut children = self.children.borrow_mut();
            match insertion {
                Insertion::Append => children.push(view_id),
                Insertion::At(index) => {
                    let len = children.len();
                    children.insert(index.min(len), view_id)
                }
            }
        }
        self.tree
            .parents
            .borrow_mut()
            .insert(view_id, self.this.clone());
        self.tree.record(HostOp::Attached {
            view: view_id,
            container: self.id,
            insertion,
            params,
        });
    }

    fn remove_view(&self, view: ViewId) {
        let removed = {
            let mut children = self.children.borrow_mut();
            let before = children.len();
            children.retain(|child| *child != view);
            children.len() != before
        };
        if removed {
            self.tree.parents.borrow_mut().remove(&view);
            self.tree.record(HostOp::Detached {
                view,
                container: self.id,
            });
        }
    }
}

/// In-memory rendered view.
pub struct MemoryView {
    id: ViewId,
    tree: Rc<Tree>,
    height: u32,
    text: Option<String>,
    on_click: Option<ClickHandler>,
    params: Option<LayoutParams>,
}

impl MemoryView {
    /// Text the view was inflated with.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Simulates a tap. Returns `false` when no handler is set.
    pub fn click(&self) -> bool {
        match &self.on_click {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl View for MemoryView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn parent(&self) -> Option<Rc<dyn Container>> {
        let parent: Rc<dyn Container> = self.tree.parents.borrow().get(&self.id)?.upgrade()?;
        Some(parent)
    }

    fn layout_params(&self) -> Option<LayoutParams> {
        self.params
    }

    fn measured_height(&self) -> u32 {
        self.height
    }

    fn request_layout(&self) {
        self.tree.record(HostOp::LayoutRequested(self.id));
    }

    fn on_next_layout(&self, listener: LayoutListener) -> LayoutSubscription {
        let subscription = LayoutSubscription(self.tree.next_id());
        if self.tree.manual_layout.get() {
            self.tree
                .listeners
                .borrow_mut()
                .push((self.id, subscription, listener));
        } else {
            listener.notify();
        }
        subscription
    }

    fn remove_layout_listener(&self, subscription: LayoutSubscription) {
        self.tree
            .listeners
            .borrow_mut()
            .retain(|(_, registered, _)| *registered != subscription);
    }

    fn start_animation(&self, animation: &Animation) {
        self.tree.record(HostOp::Animated {
            view: self.id,
            animation: animation.kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crouton::{CroutonId, Dimension};
    use crate::scheduler::{EventSink, ScheduledEvent};
    use std::cell::RefCell;

    fn recording_sink() -> (EventSink, Rc<RefCell<Vec<ScheduledEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let events = Rc::clone(&events);
            EventSink::new(move |event| events.borrow_mut().push(event))
        };
        (sink, events)
    }

    #[test]
    fn add_and_remove_view_track_parent() {
        let host = MemoryHost::new();
        let container = host.container(true);
        let view = host.view(40);

        container.add_view(view.clone(), Insertion::Append, LayoutParams::default());
        assert_eq!(view.parent().map(|p| p.id()), Some(container.id()));
        assert_eq!(host.attached_views(), vec![view.id()]);

        container.remove_view(view.id());
        assert!(view.parent().is_none());
        assert!(host.attached_views().is_empty());
    }

    #[test]
    fn positioned_insert_goes_first() {
        let host = MemoryHost::new();
        let container = host.container(false);
        let (first, second) = (host.view(10), host.view(10));

        container.add_view(first.clone(), Insertion::Append, LayoutParams::default());
        container.add_view(second.clone(), Insertion::At(0), LayoutParams::default());

        assert_eq!(container.children(), vec![second.id(), first.id()]);
    }

    #[test]
    fn removing_unknown_view_records_nothing() {
        let host = MemoryHost::new();
        let container = host.container(true);
        container.remove_view(ViewId(9999));
        assert!(host.journal().is_empty());
    }

    #[test]
    fn auto_layout_notifies_immediately() {
        let host = MemoryHost::new();
        let view = host.view(10);
        let (sink, events) = recording_sink();
        let id = CroutonId::new();

        view.on_next_layout(LayoutListener::new(id, sink));

        assert_eq!(*events.borrow(), vec![ScheduledEvent::LayoutComplete(id)]);
        assert_eq!(host.pending_layout_listeners(), 0);
    }

    #[test]
    fn manual_layout_waits_for_layout_pass() {
        let host = MemoryHost::new();
        host.set_auto_layout(false);
        let view = host.view(10);
        let (sink, events) = recording_sink();
        let id = CroutonId::new();

        view.on_next_layout(LayoutListener::new(id, sink));
        assert!(events.borrow().is_empty());
        assert_eq!(host.pending_layout_listeners(), 1);

        assert_eq!(host.run_layout_pass(), 1);
        assert_eq!(*events.borrow(), vec![ScheduledEvent::LayoutComplete(id)]);
    }

    #[test]
    fn removed_listener_is_never_notified() {
        let host = MemoryHost::new();
        host.set_auto_layout(false);
        let view = host.view(10);
        let (sink, events) = recording_sink();

        let subscription = view.on_next_layout(LayoutListener::new(CroutonId::new(), sink));
        view.remove_layout_listener(subscription);

        assert_eq!(host.run_layout_pass(), 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn inflate_uses_style_dimensions_and_click_handler() {
        let host = MemoryHost::new();
        let window = host.window();
        let clicked = Rc::new(Cell::new(false));
        let handler: ClickHandler = {
            let clicked = Rc::clone(&clicked);
            Rc::new(move || clicked.set(true))
        };
        let style = Style::builder().height(Dimension::Pixels(64)).build();

        let view = window.inflate("hello", &style, Some(handler));

        assert_eq!(
            view.layout_params().map(|p| p.height),
            Some(Dimension::Pixels(64))
        );
        let inflated = window.inflated();
        assert_eq!(inflated.len(), 1);
        assert_eq!(inflated[0].id(), view.id());
        assert_eq!(inflated[0].text(), Some("hello"));
        assert!(inflated[0].click());
        assert!(clicked.get());
    }

    #[test]
    fn announcements_fail_when_accessibility_is_off() {
        let host = MemoryHost::new();
        let window = host.window();
        assert!(window.announce("hi").is_ok());

        window.set_accessibility_enabled(false);
        assert!(window.announce("hi").is_err());
        assert_eq!(host.journal(), vec![HostOp::Announced("hi".to_string())]);
    }

    #[test]
    fn destroyed_window_is_not_alive() {
        let host = MemoryHost::new();
        let window = host.window();
        assert!(window.is_alive());
        window.destroy();
        assert!(!window.is_alive());
    }
}
