//! A cache storing values under random keys in a key-value store.

mod instrument;
mod value;

pub use self::instrument::{
    replay, CallHistory, CallRecord, CountCalls, RandomKeyStore, Replay, Store, STORE_NAME,
};
pub use self::value::Value;
use crate::engines::KeyValueStore;
use crate::Result;
use slog::Logger;
use std::str;

/// Which call recording layers wrap [`Cache::store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrumentation {
    /// Count successful calls.
    pub count_calls: bool,
    /// Record the arguments and result of each call.
    pub call_history: bool,
}

impl Instrumentation {
    /// No recording at all.
    pub fn none() -> Self {
        Instrumentation {
            count_calls: false,
            call_history: false,
        }
    }
}

impl Default for Instrumentation {
    fn default() -> Self {
        Instrumentation {
            count_calls: true,
            call_history: true,
        }
    }
}

/// Stores values under randomly generated keys.
///
/// Creating a cache flushes every key in the underlying store.
///
/// # Examples
///
/// ```no_run
/// # use nosql::{Cache, RedisStore};
/// let log = slog::Logger::root(slog::Discard, slog::o!());
/// let cache = Cache::new(log, RedisStore::connect("redis://127.0.0.1/")?)?;
///
/// let key = cache.store("hello")?;
/// assert_eq!(cache.get_str(&key)?, Some("hello".to_owned()));
/// # Ok::<(), failure::Error>(())
/// ```
#[allow(missing_debug_implementations)]
pub struct Cache<K: KeyValueStore> {
    log: Logger,
    kv: K,
    store: Box<dyn Store + Send>,
}

impl<K: KeyValueStore> Cache<K> {
    /// Create a cache with both counting and call history.
    pub fn new(log: Logger, kv: K) -> Result<Cache<K>> {
        Cache::with_instrumentation(log, kv, Instrumentation::default())
    }

    /// Create a cache with the chosen recording layers.
    ///
    /// History sits inside counting, so a call is counted only once its
    /// output has been recorded.
    pub fn with_instrumentation(
        log: Logger,
        kv: K,
        instrumentation: Instrumentation,
    ) -> Result<Cache<K>> {
        kv.flush()?;
        info!(log, "Flushed key-value store";
            "count_calls" => instrumentation.count_calls,
            "call_history" => instrumentation.call_history);

        let mut store: Box<dyn Store + Send> = Box::new(RandomKeyStore::new(kv.clone()));
        if instrumentation.call_history {
            store = Box::new(CallHistory::new(store, kv.clone()));
        }
        if instrumentation.count_calls {
            store = Box::new(CountCalls::new(store, kv.clone()));
        }

        Ok(Cache { log, kv, store })
    }

    /// Store `value` under a new random key and return the key.
    pub fn store(&self, value: impl Into<Value>) -> Result<String> {
        let value = value.into();
        let key = self.store.store(&value)?;
        debug!(self.log, "Stored value"; "key" => &key);
        Ok(key)
    }

    /// Raw bytes stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let data = self.kv.get(key)?;
        debug!(self.log, "Read value"; "key" => key, "found" => data.is_some());
        Ok(data)
    }

    /// The value under `key` passed through `convert`.
    ///
    /// `convert` is not called for missing keys.
    pub fn get_with<T, F>(&self, key: &str, convert: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.get(key)?.map(convert).transpose()
    }

    /// The value under `key` as UTF-8 text.
    pub fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |data| Ok(String::from_utf8(data)?))
    }

    /// The value under `key` as an integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |data| Ok(str::from_utf8(&data)?.parse()?))
    }

    /// The value under `key` as a float.
    pub fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, |data| Ok(str::from_utf8(&data)?.parse()?))
    }

    /// How many times `store` has been counted.
    pub fn calls(&self) -> Result<i64> {
        Ok(self.get_int(self.store.qualified_name())?.unwrap_or(0))
    }

    /// Counter and call history of `store`.
    pub fn history(&self) -> Result<Replay> {
        replay(&self.kv, self.store.qualified_name())
    }
}
