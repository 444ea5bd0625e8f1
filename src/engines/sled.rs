use super::KeyValueStore;
use crate::errors::NosqlError;
use crate::Result;
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use std::fs;
use std::path::PathBuf;
use std::str;
use std::sync::{Arc, Mutex, MutexGuard};

const SLED_DIR: &str = ".nosql-kv";

/// Embedded key-value engine using `sled`, with Redis-like semantics.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct SledStore {
    db: Arc<Mutex<Db>>,
}

/// What a key holds. Plain values and lists share one key space.
///
/// List elements live in their own tree, keyed by the big-endian index of
/// each element, so appends do not rewrite the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Entry {
    #[serde(rename = "v")]
    Value(Vec<u8>),

    #[serde(rename = "l")]
    List { len: u64 },
}

impl SledStore {
    /// Create a new sled store inside the given `path` directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<SledStore> {
        let path_dir = path.into();
        if !path_dir.is_dir() {
            return Err(NosqlError::NotADirectory.into());
        }
        let sled_dir = path_dir.join(SLED_DIR);

        fs::create_dir_all(&sled_dir)?;

        let db = Db::open(sled_dir)?;

        Ok(SledStore {
            db: Arc::new(Mutex::new(db)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Db>> {
        self.db.lock().map_err(|_| NosqlError::LockPoisoned.into())
    }
}

fn read_entry(db: &Db, key: &str) -> Result<Option<Entry>> {
    match db.get(key)? {
        None => Ok(None),
        Some(buf) => Ok(Some(serde_json::from_slice(&buf)?)),
    }
}

fn write_entry(db: &Db, key: &str, entry: &Entry) -> Result<()> {
    db.insert(key, serde_json::to_vec(entry)?)?;
    db.flush()?;
    Ok(())
}

fn list_tree(db: &Db, key: &str) -> Result<Tree> {
    Ok(db.open_tree(format!("list:{}", key))?)
}

fn clear_list(db: &Db, key: &str) -> Result<()> {
    let tree = list_tree(db, key)?;
    for index in tree.iter().keys() {
        tree.remove(index?)?;
    }
    Ok(())
}

impl KeyValueStore for SledStore {
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let store = self.lock()?;

        if let Some(Entry::List { .. }) = read_entry(&store, key)? {
            clear_list(&store, key)?;
        }
        write_entry(&store, key, &Entry::Value(value))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.lock()?;

        match read_entry(&store, key)? {
            None => Ok(None),
            Some(Entry::Value(value)) => Ok(Some(value)),
            Some(Entry::List { .. }) => Err(NosqlError::WrongType.into()),
        }
    }

    fn incr(&self, key: &str, by: i64) -> Result<i64> {
        let store = self.lock()?;

        let current = match read_entry(&store, key)? {
            None => 0,
            Some(Entry::Value(value)) => str::from_utf8(&value)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or(NosqlError::NotAnInteger)?,
            Some(Entry::List { .. }) => return Err(NosqlError::WrongType.into()),
        };
        let next = current.checked_add(by).ok_or(NosqlError::NotAnInteger)?;

        write_entry(&store, key, &Entry::Value(next.to_string().into_bytes()))?;
        Ok(next)
    }

    fn rpush(&self, key: &str, value: Vec<u8>) -> Result<u64> {
        let store = self.lock()?;

        let len = match read_entry(&store, key)? {
            None => 0,
            Some(Entry::List { len }) => len,
            Some(Entry::Value(_)) => return Err(NosqlError::WrongType.into()),
        };

        list_tree(&store, key)?.insert(len.to_be_bytes(), value)?;
        write_entry(&store, key, &Entry::List { len: len + 1 })?;
        Ok(len + 1)
    }

    fn lrange(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let store = self.lock()?;

        match read_entry(&store, key)? {
            None => Ok(Vec::new()),
            Some(Entry::List { .. }) => list_tree(&store, key)?
                .iter()
                .values()
                .map(|buf| -> Result<Vec<u8>> { Ok(buf?.to_vec()) })
                .collect(),
            Some(Entry::Value(_)) => Err(NosqlError::WrongType.into()),
        }
    }

    fn flush(&self) -> Result<()> {
        let store = self.lock()?;

        for key in store.iter().keys() {
            let key = key?;
            if let Ok(name) = str::from_utf8(&key) {
                if let Some(Entry::List { .. }) = read_entry(&store, name)? {
                    clear_list(&store, name)?;
                }
            }
            store.remove(key)?;
        }
        store.flush()?;
        Ok(())
    }
}
