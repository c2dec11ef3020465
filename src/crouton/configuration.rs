// SPDX-License-Identifier: MPL-2.0
//! Timing configuration for a crouton.
//!
//! A [`Configuration`] says how long a crouton stays visible and which
//! animations are used to bring it in and out. It is an immutable value,
//! usually shared through a [`Style`](super::Style) and optionally overridden
//! per crouton.

use crate::config::{DURATION_INFINITE_MS, DURATION_LONG_MS, DURATION_SHORT_MS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifier of a host-provided animation resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u32);

/// How long a crouton stays visible once its enter animation has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum DisplayDuration {
    /// Removed automatically after the given time.
    Finite(Duration),
    /// Stays visible until it is removed explicitly.
    Infinite,
}

impl DisplayDuration {
    /// Short display duration (3 seconds).
    pub const SHORT: Self = Self::Finite(Duration::from_millis(DURATION_SHORT_MS));

    /// Long display duration (5 seconds).
    pub const LONG: Self = Self::Finite(Duration::from_millis(DURATION_LONG_MS));

    /// Creates a finite duration from milliseconds.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::Finite(Duration::from_millis(millis))
    }

    #[must_use]
    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Returns the finite duration, or `None` for [`DisplayDuration::Infinite`].
    #[must_use]
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            Self::Finite(duration) => Some(duration),
            Self::Infinite => None,
        }
    }
}

impl Default for DisplayDuration {
    fn default() -> Self {
        Self::SHORT
    }
}

impl TryFrom<i64> for DisplayDuration {
    type Error = String;

    fn try_from(millis: i64) -> Result<Self, Self::Error> {
        if millis == DURATION_INFINITE_MS {
            return Ok(Self::Infinite);
        }
        u64::try_from(millis)
            .map(Self::from_millis)
            .map_err(|_| format!("invalid display duration: {millis}ms"))
    }
}

impl From<DisplayDuration> for i64 {
    fn from(duration: DisplayDuration) -> Self {
        match duration {
            DisplayDuration::Finite(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
            DisplayDuration::Infinite => DURATION_INFINITE_MS,
        }
    }
}

impl fmt::Display for DisplayDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(d) => write!(f, "{}ms", d.as_millis()),
            Self::Infinite => write!(f, "infinite"),
        }
    }
}

/// Display duration and animation resources of a crouton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Configuration {
    duration: DisplayDuration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    in_animation: Option<AnimationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    out_animation: Option<AnimationId>,
}

impl Configuration {
    /// Starts a builder with the default (short) duration and built-in animations.
    #[must_use]
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// A configuration that keeps the crouton visible until removed.
    #[must_use]
    pub fn infinite() -> Self {
        Self::builder().duration(DisplayDuration::Infinite).build()
    }

    #[must_use]
    pub fn duration(&self) -> DisplayDuration {
        self.duration
    }

    /// Animation resource for the enter transition. `None` means the built-in slide.
    #[must_use]
    pub fn in_animation(&self) -> Option<AnimationId> {
        self.in_animation
    }

    /// Animation resource for the exit transition. `None` means the built-in slide.
    #[must_use]
    pub fn out_animation(&self) -> Option<AnimationId> {
        self.out_animation
    }
}

/// Fluent builder for [`Configuration`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationBuilder {
    duration: DisplayDuration,
    in_animation: Option<AnimationId>,
    out_animation: Option<AnimationId>,
}

impl ConfigurationBuilder {
    #[must_use]
    pub fn duration(mut self, duration: DisplayDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the display duration in milliseconds.
    #[must_use]
    pub fn duration_millis(self, millis: u64) -> Self {
        self.duration(DisplayDuration::from_millis(millis))
    }

    #[must_use]
    pub fn in_animation(mut self, animation: AnimationId) -> Self {
        self.in_animation = Some(animation);
        self
    }

    #[must_use]
    pub fn out_animation(mut self, animation: AnimationId) -> Self {
        self.out_animation = Some(animation);
        self
    }

    #[must_use]
    pub fn build(self) -> Configuration {
        Configuration {
            duration: self.duration,
            in_animation: self.in_animation,
            out_animation: self.out_animation,
        }
    }
}
