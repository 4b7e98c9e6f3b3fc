//! Application configuration.
//!
//! The defaults reproduce the classic behavior: GBK as the fallback decode
//! encoding, and the clipboard encoding chosen by the running platform. A
//! JSON file can override them:
//!
//! - Linux: `~/.config/pathclip/config.json`
//! - macOS: `~/Library/Application Support/pathclip/config.json`
//! - Windows: `%APPDATA%/pathclip/config.json`
//!
//! or any file named by the `PATHCLIP_CONFIG` environment variable.
//!
//! # Example
//!
//! ```json
//! {
//!   "fallback_encoding": "gbk",
//!   "clipboard": { "encoding": "utf-8", "prefer_external_tools": true }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use encoding_rs::{Encoding, GBK};
use serde::{Deserialize, Serialize};

use crate::platform::{ClipboardConfig, default_clipboard_encoding};

// ============================================================================
// Constants
// ============================================================================

/// Application name used for the configuration directory.
const APP_NAME: &str = "pathclip";

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "PATHCLIP_CONFIG";

/// Label of the default fallback decode encoding.
const DEFAULT_FALLBACK_LABEL: &str = "gbk";

// ============================================================================
// AppConfig
// ============================================================================

/// Clipboard-related settings as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClipboardSettings {
    /// Encoding label for clipboard text; `None` picks the platform default.
    pub encoding: Option<String>,
    /// Whether external tools (`clip`, `pbcopy`, `wl-copy`...) are tried first.
    pub prefer_external_tools: bool,
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self {
            encoding: None,
            prefer_external_tools: true,
        }
    }
}

/// Application configuration as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Encoding label tried when the input is not valid UTF-8.
    pub fallback_encoding: String,
    /// Clipboard settings.
    pub clipboard: ClipboardSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fallback_encoding: DEFAULT_FALLBACK_LABEL.to_string(),
            clipboard: ClipboardSettings::default(),
        }
    }
}

impl AppConfig {
    /// Returns the configuration file location, if one can be determined.
    ///
    /// `PATHCLIP_CONFIG` wins over the platform config directory.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(explicit));
        }

        let mut path = dirs::config_dir()?;
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        Some(path)
    }

    /// Loads the configuration, falling back to defaults.
    ///
    /// A missing file is normal and silent; an unreadable or malformed one is
    /// logged before the defaults are used.
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::debug!("No config directory on this platform, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::try_load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Config load failed, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Attempts to load the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Resolves the fallback decode encoding.
    ///
    /// Unknown labels fall back to GBK.
    #[must_use]
    pub fn fallback_encoding(&self) -> &'static Encoding {
        resolve_encoding(&self.fallback_encoding).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown fallback encoding '{}', using {}",
                self.fallback_encoding,
                GBK.name()
            );
            GBK
        })
    }

    /// Resolves the clipboard settings into the value handed to backends.
    ///
    /// Unknown labels fall back to the platform default.
    #[must_use]
    pub fn clipboard_config(&self) -> ClipboardConfig {
        let platform_default = default_clipboard_encoding();
        let encoding = match self.clipboard.encoding.as_deref() {
            None => platform_default,
            Some(label) => resolve_encoding(label).unwrap_or_else(|| {
                tracing::warn!(
                    "Unknown clipboard encoding '{label}', using {}",
                    platform_default.name()
                );
                platform_default
            }),
        };

        ClipboardConfig {
            encoding,
            prefer_external_tools: self.clipboard.prefer_external_tools,
        }
    }
}

/// Looks up an encoding by its WHATWG label (`"gbk"`, `"utf-8"`, `"shift_jis"`...).
fn resolve_encoding(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

// ============================================================================
// Tests
// ============================================================================
