//! Configuration types
//!
//! Stream configuration fixed when a pipeline is constructed. Stored either as
//! TOML text or as postcard binary data.

#[cfg(feature = "serde")]
pub mod loader;
pub mod stream;

#[cfg(feature = "serde")]
pub use loader::{from_postcard, from_toml, to_postcard_vec, ConfigError};
pub use stream::{InvalidConfig, RawPixelFormat, ResolutionPolicy, StreamConfig, CONFIG_VERSION};
