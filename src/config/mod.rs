// SPDX-License-Identifier: MPL-2.0
//! Loading and saving of queue settings from a `crouton.toml` file.
//!
//! # Configuration Sections
//!
//! - `[timing]` - Display durations and the built-in animation duration
//! - `[diagnostics]` - Lifecycle event collection
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with an explicit path
//! 2. Pass a directory to `load_with_override()`/`save_with_override()`
//! 3. Set the `CROUTON_CONFIG_DIR` environment variable
//! 4. Falls back to the platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use crouton::config;
//!
//! // Load existing settings (returns tuple with optional warning)
//! let (mut settings, _warning) = config::load();
//!
//! settings.timing.animation_ms = 250;
//!
//! config::save(&settings).expect("Failed to save settings");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::crouton::{Configuration, DisplayDuration};
use crate::diagnostics::BufferCapacity;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "crouton.toml";

/// Application name used for directory naming.
const APP_NAME: &str = "Crouton";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "CROUTON_CONFIG_DIR";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Display duration of croutons without an explicit configuration.
    /// `-1` keeps them on screen until removed.
    #[serde(rename = "default_duration_ms")]
    pub default_duration: DisplayDuration,
    /// Duration used for long croutons.
    #[serde(rename = "long_duration_ms")]
    pub long_duration: DisplayDuration,
    /// Duration of the built-in slide animations.
    pub animation_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_duration: DisplayDuration::SHORT,
            long_duration: DisplayDuration::LONG,
            animation_ms: DEFAULT_ANIMATION_MS,
        }
    }
}

impl TimingConfig {
    /// Animation duration clamped to the supported range.
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_ms.clamp(MIN_ANIMATION_MS, MAX_ANIMATION_MS))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    pub buffer_capacity: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_capacity: DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY,
        }
    }
}

impl DiagnosticsConfig {
    /// Buffer capacity clamped to the supported range.
    #[must_use]
    pub fn capacity(&self) -> BufferCapacity {
        BufferCapacity::new(self.buffer_capacity)
    }
}

/// Queue settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timing: TimingConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl Settings {
    /// Crouton configuration using the configured default duration.
    #[must_use]
    pub fn default_configuration(&self) -> Configuration {
        Configuration::builder()
            .duration(self.timing.default_duration)
            .build()
    }

    /// Crouton configuration using the configured long duration.
    #[must_use]
    pub fn long_configuration(&self) -> Configuration {
        Configuration::builder()
            .duration(self.timing.long_duration)
            .build()
    }
}

// =============================================================================
// Path Resolution
// =============================================================================

/// Returns the config directory.
///
/// # Resolution Order
///
/// 1. `override_path` parameter (if `Some`)
/// 2. `CROUTON_CONFIG_DIR` environment variable (if set and non-empty)
/// 3. Platform config directory with the app name appended
pub fn config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the settings from the default location.
///
/// Returns a tuple of (settings, optional_warning). A missing file yields the
/// defaults without warning; an unreadable or corrupt one yields the defaults
/// with a warning describing the failure.
pub fn load() -> (Settings, Option<String>) {
    load_with_override(None)
}

/// Loads the settings from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Settings, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(settings) => return (settings, None),
                Err(err) => {
                    return (
                        Settings::default(),
                        Some(format!("failed to load {}: {err}", path.display())),
                    );
                }
            }
        }
    }
    (Settings::default(), None)
}

/// Loads settings from a specific file.
pub fn load_from_path(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the settings to the default location.
pub fn save(settings: &Settings) -> Result<()> {
    save_with_override(settings, None)
}

/// Saves the settings to a custom directory.
pub fn save_with_override(settings: &Settings, base_dir: Option<PathBuf>) -> Result<()> {
    match config_path_with_override(base_dir) {
        Some(path) => save_to_path(settings, &path),
        None => Err(Error::Config(
            "no configuration directory available".to_string(),
        )),
    }
}

/// Saves settings to a specific file, creating parent directories.
pub fn save_to_path(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(settings).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}
