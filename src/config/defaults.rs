// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Duration**: How long a crouton stays visible
//! - **Animation**: Enter/exit animation timing
//! - **Style**: Visual defaults applied by `StyleBuilder`
//! - **Diagnostics**: Lifecycle journal capacity

// ==========================================================================
// Duration Defaults
// ==========================================================================

/// Display duration, in milliseconds, used by `Configuration::default()`.
pub const DURATION_SHORT_MS: u64 = 3000;

/// Long display duration in milliseconds.
pub const DURATION_LONG_MS: u64 = 5000;

/// Serialized marker for "stay visible until explicitly removed".
pub const DURATION_INFINITE_MS: i64 = -1;

// ==========================================================================
// Animation Defaults
// ==========================================================================

/// Duration of the built-in slide animations (in milliseconds).
pub const DEFAULT_ANIMATION_MS: u64 = 400;

/// Minimum animation duration (in milliseconds).
pub const MIN_ANIMATION_MS: u64 = 0;

/// Maximum animation duration (in milliseconds).
pub const MAX_ANIMATION_MS: u64 = 5000;

// ==========================================================================
// Style Defaults
// ==========================================================================

/// Padding around the crouton text, in pixels.
pub const DEFAULT_PADDING_PX: u32 = 10;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of lifecycle events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 1000;

/// Minimum diagnostics buffer capacity.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 100;

/// Maximum diagnostics buffer capacity.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 10000;
