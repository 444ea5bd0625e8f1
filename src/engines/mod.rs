//! Key-value engines the cache can run on.

mod redis;
mod sled;

pub use self::redis::RedisStore;
pub use self::sled::SledStore;
use crate::errors::NosqlError;
use crate::Result;
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

/// Interface for the key-value primitives the cache needs.
///
/// Semantics follow Redis: reads of missing keys are `None`, increments start
/// from zero, and list and plain values live in the same key space.
#[allow(clippy::module_name_repetitions)]
pub trait KeyValueStore: Clone + Send + 'static {
    /// Set the value for the given key, overwriting any previous value.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;
    /// Get the value for the given key, if it exists.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Add `by` to the integer stored at `key` and return the new value.
    fn incr(&self, key: &str, by: i64) -> Result<i64>;
    /// Append a value to the list at `key` and return the new length.
    fn rpush(&self, key: &str, value: Vec<u8>) -> Result<u64>;
    /// Every element of the list at `key`. Missing lists are empty.
    fn lrange(&self, key: &str) -> Result<Vec<Vec<u8>>>;
    /// Remove all keys.
    fn flush(&self) -> Result<()>;
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineType {
    Redis,
    Sled,
}

impl Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineType::Redis => write!(f, "redis"),
            EngineType::Sled => write!(f, "sled"),
        }
    }
}

impl FromStr for EngineType {
    type Err = NosqlError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "redis" => Ok(EngineType::Redis),
            "sled" => Ok(EngineType::Sled),
            _ => Err(NosqlError::UnknownEngine {
                name: s.to_owned(),
            }),
        }
    }
}

impl slog::Value for EngineType {
    fn serialize(
        &self,
        _rec: &slog::Record,
        key: slog::Key,
        serializer: &mut dyn slog::Serializer,
    ) -> slog::Result {
        match self {
            EngineType::Redis => serializer.emit_str(key, "redis"),
            EngineType::Sled => serializer.emit_str(key, "sled"),
        }
    }
}
