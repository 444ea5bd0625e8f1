//! The `nosql` crate lists and inserts documents in a document collection,
//! and caches values under random keys in a key-value store with optional
//! call counting and call history.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::module_name_repetitions, missing_docs)]

#[macro_use]
extern crate slog;

mod cache;
mod documents;
mod engines;
mod errors;

pub use self::cache::{
    replay, CallHistory, CallRecord, Cache, CountCalls, Instrumentation, RandomKeyStore, Replay,
    Store, Value, STORE_NAME,
};
pub use self::documents::{
    insert_document, list_all, Collection, Document, DocumentId, DocumentStore, SledCollection,
    ID_FIELD,
};
pub use self::engines::{EngineType, KeyValueStore, RedisStore, SledStore};
pub use self::errors::{NosqlError, Result};
