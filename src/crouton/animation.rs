// SPDX-License-Identifier: MPL-2.0
//! Enter and exit animations.
//!
//! The crate does not interpolate anything. An [`Animation`] only tells the
//! host what to play and tells the manager how long it lasts.

use super::configuration::AnimationId;
use std::time::Duration;

/// What the host should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Slide down from `-from_y` to the resting position.
    SlideInDown { from_y: u32 },
    /// Slide up from the resting position to `-to_y`.
    SlideOutUp { to_y: u32 },
    /// A host animation resource.
    Resource(AnimationId),
}

/// An animation with a known duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub kind: AnimationKind,
    pub duration: Duration,
}

impl Animation {
    #[must_use]
    pub fn new(kind: AnimationKind, duration: Duration) -> Self {
        Self { kind, duration }
    }

    /// Built-in enter animation for a view of the given measured height.
    #[must_use]
    pub fn slide_in_down(height: u32, duration: Duration) -> Self {
        Self::new(AnimationKind::SlideInDown { from_y: height }, duration)
    }

    /// Built-in exit animation for a view of the given measured height.
    #[must_use]
    pub fn slide_out_up(height: u32, duration: Duration) -> Self {
        Self::new(AnimationKind::SlideOutUp { to_y: height }, duration)
    }
}
