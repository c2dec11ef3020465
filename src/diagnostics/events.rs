// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for queue activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A queue transition with the wall-clock time it was recorded at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self::with_timestamp(kind, Utc::now())
    }

    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, kind }
    }
}

/// What happened to a crouton.
///
/// Croutons and windows are identified by their raw numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    /// Appended to the queue.
    Enqueued {
        crouton: u64,
        /// Queue length after the append.
        queue_len: usize,
    },
    /// Enter animation started.
    Displayed { crouton: u64 },
    /// Exit animation started through the normal removal path.
    Removed { crouton: u64 },
    /// Dropped because its window died before it could be shown.
    Dropped { crouton: u64, window: u64 },
    /// Withdrawn without animation.
    Cancelled { crouton: u64 },
    /// Bulk clear, of every window or of one.
    Cleared {
        #[serde(skip_serializing_if = "Option::is_none")]
        window: Option<u64>,
        count: usize,
    },
}

impl DiagnosticEventKind {
    /// The crouton this event is about, if it concerns a single one.
    #[must_use]
    pub fn crouton(&self) -> Option<u64> {
        match self {
            Self::Enqueued { crouton, .. }
            | Self::Displayed { crouton }
            | Self::Removed { crouton }
            | Self::Dropped { crouton, .. }
            | Self::Cancelled { crouton } => Some(*crouton),
            Self::Cleared { .. } => None,
        }
    }
}
