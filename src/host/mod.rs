// SPDX-License-Identifier: MPL-2.0
//! Host surface abstractions.
//!
//! The manager never talks to a GUI toolkit directly. Everything it needs
//! from the host window and its view tree goes through the traits in this
//! module: a [`HostWindow`] that can tell whether it is still alive and can
//! inflate crouton views, [`Container`]s that views are inserted into, and the
//! [`View`]s themselves.
//!
//! All handles are `Rc` based: the host tree lives on the UI thread and so
//! does the manager.
//!
//! [`memory`] provides an in-memory implementation that records every
//! operation, used by the tests and the demo binary.

pub mod memory;

use crate::crouton::{Animation, AnimationId, CroutonId, Dimension, Style};
use crate::scheduler::{EventSink, ScheduledEvent};
use std::fmt;
use std::rc::Rc;

/// Identifier of a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

/// Identifier of a view container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u64);

/// Identifier of a rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// Handle of a registered one-shot layout listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutSubscription(pub u64);

/// Invoked when the user taps a crouton view.
pub type ClickHandler = Rc<dyn Fn()>;

/// Window decorations that may overlap the content root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Chrome {
    /// The status bar is drawn translucently over the content.
    pub translucent_status: bool,
    /// The action bar is drawn over the content.
    pub action_bar_overlay: bool,
    /// Bottom edge of the action bar, if one is present.
    pub action_bar_bottom: Option<u32>,
}

impl Chrome {
    /// Top margin needed so that a view attached to the content root is not
    /// hidden behind an overlaying action bar.
    #[must_use]
    pub fn top_inset(&self) -> Option<u32> {
        if self.translucent_status || self.action_bar_overlay {
            self.action_bar_bottom
        } else {
            None
        }
    }
}

/// Where a view is inserted into its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Let the container decide, typically appended on top.
    Append,
    /// Insert at a fixed child index.
    At(usize),
}

/// Layout parameters passed along with an inserted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub width: Dimension,
    pub height: Dimension,
    pub top_margin: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: Dimension::MatchParent,
            height: Dimension::WrapContent,
            top_margin: 0,
        }
    }
}

/// Error reported by a failed accessibility announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceError(pub String);

impl fmt::Display for AnnounceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "announcement failed: {}", self.0)
    }
}

/// One-shot notification that a view finished its next layout pass.
///
/// The host keeps the listener until layout completes and then calls
/// [`LayoutListener::notify`], which posts a
/// [`ScheduledEvent::LayoutComplete`] onto the loop.
pub struct LayoutListener {
    crouton: CroutonId,
    sink: EventSink,
}

impl LayoutListener {
    pub(crate) fn new(crouton: CroutonId, sink: EventSink) -> Self {
        Self { crouton, sink }
    }

    /// The crouton waiting for this layout pass.
    #[must_use]
    pub fn crouton(&self) -> CroutonId {
        self.crouton
    }

    /// Delivers the layout-complete signal. Consumes the listener.
    pub fn notify(self) {
        self.sink.post(ScheduledEvent::LayoutComplete(self.crouton));
    }
}

impl fmt::Debug for LayoutListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutListener")
            .field("crouton", &self.crouton)
            .finish_non_exhaustive()
    }
}

/// A rendered crouton view.
pub trait View {
    fn id(&self) -> ViewId;

    /// The container this view is currently attached to.
    fn parent(&self) -> Option<Rc<dyn Container>>;

    /// Layout parameters the view was created with, if any.
    fn layout_params(&self) -> Option<LayoutParams>;

    /// Height measured during the last layout pass.
    fn measured_height(&self) -> u32;

    fn request_layout(&self);

    /// Registers a listener for the next completed layout pass.
    fn on_next_layout(&self, listener: LayoutListener) -> LayoutSubscription;

    /// Unregisters a layout listener. Unknown subscriptions are ignored.
    fn remove_layout_listener(&self, subscription: LayoutSubscription);

    fn start_animation(&self, animation: &Animation);
}

/// A view group that croutons can be inserted into.
pub trait Container {
    fn id(&self) -> ContainerId;

    /// Whether the container accepts views without an explicit index.
    ///
    /// Stacking containers do; linear ones get the crouton at index 0 so it
    /// shows up first.
    fn supports_unpositioned_insert(&self) -> bool;

    fn add_view(&self, view: Rc<dyn View>, insertion: Insertion, params: LayoutParams);

    fn remove_view(&self, view: ViewId);
}

/// The window a crouton is shown in.
pub trait HostWindow {
    fn id(&self) -> WindowId;

    /// `false` once the window is finishing or destroyed.
    fn is_alive(&self) -> bool;

    /// Root container of the window content.
    fn content_root(&self) -> Rc<dyn Container>;

    fn chrome(&self) -> Chrome;

    /// Builds the view for a text crouton.
    fn inflate(&self, text: &str, style: &Style, on_click: Option<ClickHandler>) -> Rc<dyn View>;

    /// Loads an animation resource.
    fn load_animation(&self, id: AnimationId) -> Option<Animation>;

    /// Emits an accessibility announcement for the given text.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform accessibility service is missing
    /// or refuses the announcement.
    fn announce(&self, text: &str) -> Result<(), AnnounceError>;
}
