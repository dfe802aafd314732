// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port for Quadrant tools.

use quadrant_geom::LayoutError;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure. A grid layout rejected while
    /// parsing a blob surfaces here, since the parser owns the error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A grid layout built from config values or overrides was rejected.
    #[error("grid layout rejected: {0}")]
    Layout(#[from] LayoutError),
    /// A stored value parsed but failed its own validation.
    #[error("invalid value under `{key}`: {reason}")]
    Invalid {
        /// Config key the value was loaded from.
        key: String,
        /// What the value got wrong.
        reason: String,
    },
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Config values that can reject themselves after they parse.
///
/// Serde catches malformed JSON; this catches well-formed values that still
/// make no sense for a run (a negative extent, a NaN speed).
pub trait Validate {
    /// Returns a human-readable reason if the value is unusable.
    fn validate(&self) -> Result<(), String>;
}

/// Thin service that serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Load `key`, falling back to `T::default()` when missing.
    pub fn load_or_default<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Like [`load_or_default`](Self::load_or_default), then runs the value's
    /// own [`Validate`] check and reports failure as [`ConfigError::Invalid`].
    pub fn load_valid<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default + Validate,
    {
        let value: T = self.load_or_default(key)?;
        value.validate().map_err(|reason| ConfigError::Invalid {
            key: key.to_owned(),
            reason,
        })?;
        Ok(value)
    }

    /// Validate, serialize and persist a config value for `key`.
    ///
    /// Invalid values are refused before touching the store.
    pub fn save_valid<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize + Validate,
    {
        value.validate().map_err(|reason| ConfigError::Invalid {
            key: key.to_owned(),
            reason,
        })?;
        self.save(key, value)
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}
