// SPDX-License-Identifier: MPL-2.0
//! Diagnostics for the display queue.
//!
//! The manager reports each queue transition through a [`DiagnosticsHandle`].
//! Events travel over a bounded channel to a [`DiagnosticsCollector`], which
//! keeps the most recent ones in a [`CircularBuffer`] and can export them as
//! JSON.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: ring buffer with a clamped [`BufferCapacity`]
//! - [`DiagnosticEvent`]: timestamped [`DiagnosticEventKind`]
//! - [`DiagnosticsHandle`]: cheap, non-blocking sender
//! - [`DiagnosticsCollector`]: receiving side and export

mod buffer;
mod collector;
mod events;

pub use buffer::{buffer_capacity_bounds, BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle, DiagnosticsSnapshot};
pub use events::{DiagnosticEvent, DiagnosticEventKind};
