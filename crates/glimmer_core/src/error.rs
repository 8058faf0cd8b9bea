//! # Core Error Types
//!
//! Errors only exist at the configuration edge. The per-frame simulation
//! absorbs every anomaly (full pools, degenerate sizes) as a no-op.

use thiserror::Error;

/// Errors that can occur while loading or validating effect configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML document is malformed or has wrongly-typed fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value outside its allowed range.
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidValue {
        /// Offending field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A palette entry is not a `#RRGGBB` color.
    #[error("invalid hex color: {0:?}")]
    InvalidColor(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
