// SPDX-License-Identifier: MPL-2.0
//! `crouton` queues transient notifications ("croutons") and shows them one
//! at a time on a host window.
//!
//! The crate owns the queue, the timing and the lifecycle. Rendering, layout
//! and animation playback stay with the host, reached through the traits in
//! [`host`]. Time is abstracted behind [`scheduler::Scheduler`], with a
//! deterministic virtual clock and a tokio-backed implementation.
//!
//! ```
//! use crouton::crouton::{Crouton, Style};
//! use crouton::host::memory::MemoryHost;
//! use crouton::manager::Manager;
//! use crouton::scheduler::VirtualScheduler;
//! use std::time::Duration;
//!
//! let host = MemoryHost::new();
//! let window = host.window();
//! let mut manager = Manager::new(VirtualScheduler::new());
//!
//! manager.enqueue(Crouton::make_text(window.clone(), "Saved", Style::confirm()));
//! manager.enqueue(Crouton::make_text(window, "Synced", Style::info()));
//!
//! manager.run_until_idle(Duration::from_secs(60));
//! assert!(manager.is_idle());
//! ```

#![doc(html_root_url = "https://docs.rs/crouton/0.1.0")]

pub mod config;
pub mod crouton;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod manager;
pub mod scheduler;
