//! The cache's store operation and the layers which record its calls.
//!
//! Every layer implements [`Store`] and wraps another one, so counting and
//! history can be switched on independently and stacked in either order.
//! Bookkeeping lives in the same key-value store as the cached values, keyed
//! by the operation's qualified name:
//!
//! | key              | kind    | contents                          |
//! |------------------|---------|-----------------------------------|
//! | `NAME`           | integer | number of successful calls        |
//! | `NAME:inputs`    | list    | array of each call's args         |
//! | `NAME:outputs`   | list    | key returned by each call         |

use super::Value;
use crate::engines::KeyValueStore;
use crate::Result;
use std::fmt;
use std::fmt::Display;
use uuid::Uuid;

/// Qualified name of [`Cache::store`](crate::Cache::store).
pub const STORE_NAME: &str = "Cache::store";

/// An operation which stores a value and returns the key it was stored under.
pub trait Store {
    /// Identity used to namespace the operation's counter and history.
    fn qualified_name(&self) -> &str;

    /// Store `value`, returning its key.
    fn store(&self, value: &Value) -> Result<String>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn qualified_name(&self) -> &str {
        (**self).qualified_name()
    }

    fn store(&self, value: &Value) -> Result<String> {
        (**self).store(value)
    }
}

/// Writes each value under a fresh random UUID.
#[derive(Debug, Clone)]
pub struct RandomKeyStore<K: KeyValueStore> {
    kv: K,
}

impl<K: KeyValueStore> RandomKeyStore<K> {
    #[allow(missing_docs)]
    pub fn new(kv: K) -> Self {
        RandomKeyStore { kv }
    }
}

impl<K: KeyValueStore> Store for RandomKeyStore<K> {
    fn qualified_name(&self) -> &str {
        STORE_NAME
    }

    fn store(&self, value: &Value) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.kv.set(&key, value.to_bytes())?;
        Ok(key)
    }
}

/// Increments a counter named after the wrapped operation on every successful call.
#[derive(Debug, Clone)]
pub struct CountCalls<S: Store, K: KeyValueStore> {
    inner: S,
    kv: K,
}

impl<S: Store, K: KeyValueStore> CountCalls<S, K> {
    #[allow(missing_docs)]
    pub fn new(inner: S, kv: K) -> Self {
        CountCalls { inner, kv }
    }
}

impl<S: Store, K: KeyValueStore> Store for CountCalls<S, K> {
    fn qualified_name(&self) -> &str {
        self.inner.qualified_name()
    }

    fn store(&self, value: &Value) -> Result<String> {
        let key = self.inner.store(value)?;
        self.kv.incr(self.qualified_name(), 1)?;
        Ok(key)
    }
}

/// Appends the arguments and result of every call to the operation's history lists.
///
/// Inputs are pushed before the wrapped call, so a failed call leaves an input
/// without a matching output.
#[derive(Debug, Clone)]
pub struct CallHistory<S: Store, K: KeyValueStore> {
    inner: S,
    kv: K,
}

impl<S: Store, K: KeyValueStore> CallHistory<S, K> {
    #[allow(missing_docs)]
    pub fn new(inner: S, kv: K) -> Self {
        CallHistory { inner, kv }
    }
}

impl<S: Store, K: KeyValueStore> Store for CallHistory<S, K> {
    fn qualified_name(&self) -> &str {
        self.inner.qualified_name()
    }

    fn store(&self, value: &Value) -> Result<String> {
        let name = self.qualified_name();
        let args = snapshot(&[value])?;

        self.kv.rpush(&inputs_key(name), args)?;
        let key = self.inner.store(value)?;
        self.kv.rpush(&outputs_key(name), key.clone().into_bytes())?;

        Ok(key)
    }
}

/// JSON array of the arguments, except that non-finite floats are written as
/// `NaN`, `inf` or `-inf` rather than collapsing to `null`.
fn snapshot(args: &[&Value]) -> Result<Vec<u8>> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Value::Float(float) if !float.is_finite() => parts.push(float.to_string()),
            _ => parts.push(serde_json::to_string(arg)?),
        }
    }
    Ok(format!("[{}]", parts.join(",")).into_bytes())
}

fn inputs_key(name: &str) -> String {
    format!("{}:inputs", name)
}

fn outputs_key(name: &str) -> String {
    format!("{}:outputs", name)
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// JSON array of the call's arguments.
    pub inputs: String,
    /// What the call returned.
    pub output: String,
}

/// Everything recorded about an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// Qualified name of the operation.
    pub name: String,
    /// Value of the call counter, zero if calls were never counted.
    pub calls: i64,
    /// Recorded calls, oldest first.
    pub records: Vec<CallRecord>,
}

/// Read back the counter and call history of the operation `name`.
///
/// Inputs and outputs are paired by position. A failed call records an input
/// but no output, so from that call on each record pairs a call's inputs with
/// the output of a later call.
pub fn replay<K: KeyValueStore>(kv: &K, name: &str) -> Result<Replay> {
    let calls = match kv.get(name)? {
        None => 0,
        Some(count) => String::from_utf8(count)?.parse::<i64>()?,
    };

    let inputs = kv.lrange(&inputs_key(name))?;
    let outputs = kv.lrange(&outputs_key(name))?;

    let records = inputs
        .into_iter()
        .zip(outputs)
        .map(|(inputs, output)| {
            Ok(CallRecord {
                inputs: String::from_utf8(inputs)?,
                output: String::from_utf8(output)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Replay {
        name: name.to_owned(),
        calls,
        records,
    })
}

impl Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.name, self.calls)?;
        for CallRecord { inputs, output } in &self.records {
            write!(f, "\n{}({}) -> {}", self.name, inputs, output)?;
        }
        Ok(())
    }
}
