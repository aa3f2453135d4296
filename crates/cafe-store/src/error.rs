//! # Store Error Types
//!
//! Store mutations fail with [`cafe_core::CoreError`]. This module holds the
//! errors that only exist at the edge of the crate: loading and saving the
//! `store.toml` configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Config Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   File Access   │  │    Format       │  │     Semantics           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Io             │  │  Parse          │  │  Invalid                │ │
//! │  │  NoConfigPath   │  │  Serialize      │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures while loading, validating or saving [`crate::StoreConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be written out as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Parsed fine, but the values make no sense.
    ///
    /// ## When This Occurs
    /// - No tables configured
    /// - A table with zero seats
    /// - Tax rate above 100%
    /// - Event channel capacity of zero
    #[error("Invalid store configuration: {0}")]
    Invalid(String),

    /// Neither an explicit path nor a platform config dir is available.
    #[error("No config path available")]
    NoConfigPath,
}

impl ConfigError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::Invalid(msg.into())
    }
}
