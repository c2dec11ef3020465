// SPDX-License-Identifier: MPL-2.0
//! Notification descriptors.
//!
//! A [`Crouton`] describes one notification: its content (text or a custom
//! view), its [`Style`], an optional [`Configuration`] override, the window it
//! belongs to and optional callbacks. It is handed to the
//! [`Manager`](crate::manager::Manager), which owns it until it is removed.
//!
//! # Usage
//!
//! ```ignore
//! use crouton::crouton::{Crouton, Style};
//!
//! let crouton = Crouton::make_text(window.clone(), "Saved", Style::confirm());
//! manager.enqueue(crouton);
//! ```

mod animation;
mod configuration;
mod style;

pub use animation::{Animation, AnimationKind};
pub use configuration::{AnimationId, Configuration, ConfigurationBuilder, DisplayDuration};
pub use style::{
    palette, Color, Dimension, Font, Gravity, Image, Padding, ScaleType, Style, StyleBuilder,
    TextShadow,
};

use crate::error::{ContractViolation, Result};
use crate::host::{ClickHandler, Container, HostWindow, LayoutSubscription, View, WindowId};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Unique identifier for a crouton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CroutonId(u64);

impl CroutonId {
    /// Creates a new unique crouton ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for CroutonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CroutonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crouton#{}", self.0)
    }
}

/// Display state of a crouton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Queued, not attached to the host.
    #[default]
    Pending,
    /// Attached, enter animation in flight.
    Entering,
    /// Enter animation finished, visible-duration timer running.
    Visible,
    /// Exit animation in flight.
    Exiting,
    /// Detached with all host references cleared.
    Removed,
}

impl Phase {
    /// Whether the crouton occupies the host surface in this phase.
    #[must_use]
    pub fn is_on_screen(self) -> bool {
        matches!(self, Phase::Entering | Phase::Visible | Phase::Exiting)
    }
}

/// Callbacks fired as a crouton moves through its lifecycle.
pub trait LifecycleCallback {
    /// Called once the enter animation starts.
    fn on_displayed(&self);

    /// Called once the crouton has been taken off screen.
    fn on_removed(&self);
}

/// What a crouton shows.
#[derive(Clone)]
pub enum Content {
    Text(String),
    /// A caller-provided view, displayed as is.
    Custom(Rc<dyn View>),
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Content::Custom(view) => f.debug_tuple("Custom").field(&view.id()).finish(),
        }
    }
}

/// A notification to be displayed on a host window.
pub struct Crouton {
    id: CroutonId,
    content: Content,
    style: Arc<Style>,
    configuration: Option<Configuration>,
    window_id: WindowId,
    window: Option<Rc<dyn HostWindow>>,
    container: Option<Rc<dyn Container>>,
    on_click: Option<ClickHandler>,
    lifecycle: Option<Box<dyn LifecycleCallback>>,
    view: Option<Rc<dyn View>>,
    in_animation: Option<Animation>,
    out_animation: Option<Animation>,
    layout_subscription: Option<LayoutSubscription>,
    phase: Phase,
}

impl Crouton {
    /// Starts a builder. See [`CroutonBuilder::build`] for the required fields.
    #[must_use]
    pub fn builder() -> CroutonBuilder {
        CroutonBuilder::default()
    }

    /// Creates a text crouton attached to the window content root.
    pub fn make_text(
        window: Rc<dyn HostWindow>,
        text: impl Into<String>,
        style: impl Into<Arc<Style>>,
    ) -> Self {
        Self::new(window, Content::Text(text.into()), style.into(), None)
    }

    /// Creates a text crouton shown inside `container`.
    pub fn make_text_in(
        window: Rc<dyn HostWindow>,
        text: impl Into<String>,
        style: impl Into<Arc<Style>>,
        container: Rc<dyn Container>,
    ) -> Self {
        Self::new(
            window,
            Content::Text(text.into()),
            style.into(),
            Some(container),
        )
    }

    /// Creates a crouton that displays a custom view with the default style.
    pub fn make(window: Rc<dyn HostWindow>, view: Rc<dyn View>) -> Self {
        Self::new(window, Content::Custom(view), Arc::new(Style::default()), None)
    }

    /// Creates a crouton that displays a custom view inside `container`.
    pub fn make_in(
        window: Rc<dyn HostWindow>,
        view: Rc<dyn View>,
        container: Rc<dyn Container>,
    ) -> Self {
        Self::new(
            window,
            Content::Custom(view),
            Arc::new(Style::default()),
            Some(container),
        )
    }

    fn new(
        window: Rc<dyn HostWindow>,
        content: Content,
        style: Arc<Style>,
        container: Option<Rc<dyn Container>>,
    ) -> Self {
        let view = match &content {
            Content::Custom(view) => Some(Rc::clone(view)),
            Content::Text(_) => None,
        };
        Self {
            id: CroutonId::new(),
            content,
            style,
            configuration: None,
            window_id: window.id(),
            window: Some(window),
            container,
            on_click: None,
            lifecycle: None,
            view,
            in_animation: None,
            out_animation: None,
            layout_subscription: None,
            phase: Phase::Pending,
        }
    }

    /// Overrides the configuration of the style.
    #[must_use]
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Sets the handler invoked when the crouton view is tapped.
    #[must_use]
    pub fn with_on_click(mut self, handler: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn with_lifecycle_callback(mut self, callback: impl LifecycleCallback + 'static) -> Self {
        self.lifecycle = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn id(&self) -> CroutonId {
        self.id
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The text of a text crouton.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Custom(_) => None,
        }
    }

    #[must_use]
    pub fn style(&self) -> &Arc<Style> {
        &self.style
    }

    /// The crouton configuration, falling back to the style's.
    #[must_use]
    pub fn configuration(&self) -> Configuration {
        self.configuration.unwrap_or(self.style.configuration)
    }

    /// The window the crouton was created for. Stays set after removal.
    #[must_use]
    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    /// The live window reference, cleared once the crouton is removed.
    #[must_use]
    pub fn window(&self) -> Option<&Rc<dyn HostWindow>> {
        self.window.as_ref()
    }

    #[must_use]
    pub fn container(&self) -> Option<&Rc<dyn Container>> {
        self.container.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the window is still present and alive.
    #[must_use]
    pub fn is_host_alive(&self) -> bool {
        self.window.as_ref().is_some_and(|window| window.is_alive())
    }

    /// Whether the crouton view currently has a parent.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.view.as_ref().is_some_and(|view| view.parent().is_some())
    }

    /// Returns the view, inflating it from the window on first use.
    pub(crate) fn view(&mut self) -> Option<Rc<dyn View>> {
        if self.view.is_none() {
            let window = self.window.as_ref()?;
            if let Content::Text(text) = &self.content {
                self.view = Some(window.inflate(text, &self.style, self.on_click.clone()));
            }
        }
        self.view.clone()
    }

    /// Resolves and caches the enter and exit animations.
    ///
    /// Animation resources come from the window; without one, or when the
    /// window cannot load it, the built-in slides sized to the measured view
    /// height are used.
    pub(crate) fn animations(&mut self, default_duration: Duration) -> (Animation, Animation) {
        let configuration = self.configuration();
        let height = self.view().map_or(0, |view| view.measured_height());
        let window = self.window.clone();
        let load = |id: Option<AnimationId>| {
            id.and_then(|id| window.as_ref().and_then(|w| w.load_animation(id)))
        };

        let enter = *self.in_animation.get_or_insert_with(|| {
            load(configuration.in_animation())
                .unwrap_or_else(|| Animation::slide_in_down(height, default_duration))
        });
        let exit = *self.out_animation.get_or_insert_with(|| {
            load(configuration.out_animation())
                .unwrap_or_else(|| Animation::slide_out_up(height, default_duration))
        });
        (enter, exit)
    }

    /// Enter + exit + display duration, or `None` for infinite croutons.
    pub(crate) fn cycle_duration(&mut self, default_animation: Duration) -> Option<Duration> {
        let display = self.configuration().duration().as_duration()?;
        let (enter, exit) = self.animations(default_animation);
        Some(enter.duration + exit.duration + display)
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_layout_subscription(&mut self, subscription: LayoutSubscription) {
        self.layout_subscription = Some(subscription);
    }

    pub(crate) fn take_layout_subscription(&mut self) -> Option<LayoutSubscription> {
        self.layout_subscription.take()
    }

    pub(crate) fn is_awaiting_layout(&self) -> bool {
        self.layout_subscription.is_some()
    }

    pub(crate) fn fire_displayed(&self) {
        if let Some(callback) = &self.lifecycle {
            callback.on_displayed();
        }
    }

    /// Fires `on_removed` and drops the callback so it can only fire once.
    pub(crate) fn fire_removed(&mut self) {
        if let Some(callback) = self.lifecycle.take() {
            callback.on_removed();
        }
    }

    /// Detaches the view from its parent without animation and drops any
    /// layout listener still registered.
    ///
    /// Only a crouton that attached its view detaches it; a custom view
    /// shared with the crouton on screen stays where it is.
    pub(crate) fn detach_view(&mut self) {
        let Some(view) = self.view.clone() else {
            return;
        };
        if let Some(subscription) = self.layout_subscription.take() {
            view.remove_layout_listener(subscription);
        }
        if !self.phase.is_on_screen() {
            return;
        }
        if let Some(parent) = view.parent() {
            parent.remove_view(view.id());
        }
    }

    /// Clears the transient host references.
    pub(crate) fn release(&mut self) {
        self.window = None;
        self.container = None;
        self.lifecycle = None;
        self.layout_subscription = None;
    }
}

impl PartialEq for Crouton {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Crouton {}

impl fmt::Debug for Crouton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crouton")
            .field("id", &self.id)
            .field("content", &self.content)
            .field("configuration", &self.configuration())
            .field("window", &self.window_id)
            .field("attached_to_window", &self.window.is_some())
            .field("container", &self.container.as_ref().map(|c| c.id()))
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Crouton`] that validates required fields at construction.
#[derive(Default)]
pub struct CroutonBuilder {
    window: Option<Rc<dyn HostWindow>>,
    text: Option<String>,
    custom: Option<Rc<dyn View>>,
    style: Option<Arc<Style>>,
    configuration: Option<Configuration>,
    container: Option<Rc<dyn Container>>,
    on_click: Option<ClickHandler>,
    lifecycle: Option<Box<dyn LifecycleCallback>>,
}

impl CroutonBuilder {
    #[must_use]
    pub fn window(mut self, window: Rc<dyn HostWindow>) -> Self {
        self.window = Some(window);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn custom_view(mut self, view: Rc<dyn View>) -> Self {
        self.custom = Some(view);
        self
    }

    #[must_use]
    pub fn style(mut self, style: impl Into<Arc<Style>>) -> Self {
        self.style = Some(style.into());
        self
    }

    #[must_use]
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    #[must_use]
    pub fn container(mut self, container: Rc<dyn Container>) -> Self {
        self.container = Some(container);
        self
    }

    #[must_use]
    pub fn on_click(mut self, handler: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn lifecycle_callback(mut self, callback: impl LifecycleCallback + 'static) -> Self {
        self.lifecycle = Some(Box::new(callback));
        self
    }

    /// Builds the crouton.
    ///
    /// A missing style falls back to [`Style::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::MissingWindow`] without a window,
    /// [`ContractViolation::MissingContent`] without text or custom view, and
    /// [`ContractViolation::ConflictingContent`] when both are set.
    pub fn build(self) -> Result<Crouton> {
        let window = self.window.ok_or(ContractViolation::MissingWindow)?;
        let content = match (self.text, self.custom) {
            (Some(text), None) => Content::Text(text),
            (None, Some(view)) => Content::Custom(view),
            (Some(_), Some(_)) => return Err(ContractViolation::ConflictingContent.into()),
            (None, None) => return Err(ContractViolation::MissingContent.into()),
        };
        let style = self.style.unwrap_or_default();

        let mut crouton = Crouton::new(window, content, style, self.container);
        crouton.configuration = self.configuration;
        crouton.on_click = self.on_click;
        crouton.lifecycle = self.lifecycle;
        Ok(crouton)
    }
}
