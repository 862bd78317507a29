//! Configuration loading
//!
//! Parses a [`StreamConfig`] from TOML text or postcard binary data and
//! validates it before it reaches the pipeline.

use alloc::vec::Vec;

use super::stream::{InvalidConfig, StreamConfig, CONFIG_VERSION};

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Postcard deserialization failed
    Deserialize,
    /// Postcard serialization failed
    Serialize,
    /// TOML parsing failed
    TomlParse,
    /// Config version mismatch
    VersionMismatch {
        /// Version found in the data
        found: u8,
    },
    /// Values failed validation
    Invalid(InvalidConfig),
}

impl From<InvalidConfig> for ConfigError {
    fn from(e: InvalidConfig) -> Self {
        ConfigError::Invalid(e)
    }
}

fn check(config: StreamConfig) -> Result<StreamConfig, ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::VersionMismatch {
            found: config.version,
        });
    }
    config.validate()?;
    Ok(config)
}

/// Load configuration from TOML text
///
/// Missing keys take their default values.
pub fn from_toml(text: &str) -> Result<StreamConfig, ConfigError> {
    let config: StreamConfig = toml::from_str(text).map_err(|_| ConfigError::TomlParse)?;
    check(config)
}

/// Load configuration from postcard binary format
pub fn from_postcard(bytes: &[u8]) -> Result<StreamConfig, ConfigError> {
    let config: StreamConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
    check(config)
}

/// Serialize configuration to postcard binary format
pub fn to_postcard_vec(config: &StreamConfig) -> Result<Vec<u8>, ConfigError> {
    postcard::to_allocvec(config).map_err(|_| ConfigError::Serialize)
}
