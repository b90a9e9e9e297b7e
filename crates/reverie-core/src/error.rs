//! Error types for the parameter bridge.

use std::path::PathBuf;
use thiserror::Error;

use crate::lifecycle::LifecycleState;

/// Errors from saving or loading plugin state.
#[derive(Debug, Error)]
pub enum StateError {
    /// The output stream accepted fewer bytes than the record holds
    #[error("state stream accepted {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes accepted before the stream stopped.
        written: usize,
        /// Size of the state record.
        expected: usize,
    },

    /// The input stream ended before a whole record was read
    #[error("state stream ended after {read} of {expected} bytes")]
    ShortRead {
        /// Bytes read before the stream ended.
        read: usize,
        /// Size of the state record.
        expected: usize,
    },

    /// The record header is not one this build understands
    #[error("unrecognized state format (magic {magic:02x?}, version {version})")]
    UnknownFormat {
        /// The four magic bytes found.
        magic: [u8; 4],
        /// The format version found.
        version: u16,
    },

    /// A stored value is NaN or infinite
    #[error("state field '{field}' is not a finite number")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The underlying stream failed
    #[error("state stream I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from lifecycle transitions the host is not allowed to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The instance was not in the state the transition starts from
    #[error("illegal lifecycle transition from {from:?} to {to:?}")]
    IllegalTransition {
        /// State the instance was actually in.
        from: LifecycleState,
        /// State the caller asked for.
        to: LifecycleState,
    },

    /// Reset requested while the instance is not active
    #[error("reset is only legal while active (state is {0:?})")]
    ResetWhileInactive(LifecycleState),

    /// Destroy requested while the instance is still active
    #[error("destroy is only legal while inactive (state is {0:?})")]
    DestroyWhileActive(LifecycleState),
}

/// Errors from loading configuration or presets.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Preset not found
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// A configured value is outside what the plugin can use
    #[error("invalid config value for '{key}': {reason}")]
    InvalidValue {
        /// Config key.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }
}
