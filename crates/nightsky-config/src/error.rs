//! Configuration error types.

use nightsky_field::InvalidField;

/// Errors that can occur when loading, saving, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse TOML content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] toml::de::Error),

    /// Failed to serialize config to TOML.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] toml::ser::Error),

    /// No home directory to place the config in.
    #[error("could not determine a configuration directory")]
    NoConfigDir,

    /// The effective field configuration cannot be animated.
    #[error("invalid field configuration: {0}")]
    InvalidField(#[from] InvalidField),
}
