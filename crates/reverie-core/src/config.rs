//! Plugin configuration.
//!
//! Compiled-in defaults, optionally overridden by a TOML file named in the
//! `REVERIE_CONFIG` environment variable. The file is read once per plugin
//! instance on the main thread; any problem is logged and the defaults are
//! used instead, so a bad config never prevents the plugin from loading.
//!
//! ```toml
//! idle_interval_ms = 20
//!
//! [gui]
//! width = 512
//! height = 150
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming an override file.
pub const CONFIG_ENV: &str = "REVERIE_CONFIG";

/// Editor window settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 150,
        }
    }
}

/// Per-instance plugin settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Editor window.
    pub gui: GuiConfig,
    /// Period of the main-thread idle tick that moves values between the
    /// editor and the store.
    pub idle_interval_ms: u32,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            gui: GuiConfig::default(),
            idle_interval_ms: 20,
        }
    }
}

impl PluginConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Load the file named by `REVERIE_CONFIG`, or the defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                tracing::info!(path = ?path, "loaded plugin config");
                config
            }
            Err(err) => {
                tracing::warn!(path = ?path, error = %err, "ignoring plugin config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.gui.width == 0 || self.gui.height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "gui",
                reason: format!(
                    "window must be non-empty, got {}x{}",
                    self.gui.width, self.gui.height
                ),
            });
        }
        if !(1..=1000).contains(&self.idle_interval_ms) {
            return Err(ConfigError::InvalidValue {
                key: "idle_interval_ms",
                reason: format!("must be 1..=1000, got {}", self.idle_interval_ms),
            });
        }
        Ok(())
    }
}
