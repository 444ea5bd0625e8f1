use super::KeyValueStore;
use crate::errors::NosqlError;
use crate::Result;
use redis::{Client, Commands, Connection};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Key-value engine backed by a Redis server, over a single blocking connection.
#[derive(Clone)]
pub struct RedisStore {
    url: String,
    connection: Arc<Mutex<Connection>>,
}

impl RedisStore {
    /// Connect to the Redis server at `url`, e.g. `redis://127.0.0.1/`.
    pub fn connect(url: &str) -> Result<RedisStore> {
        let client = Client::open(url)?;
        let connection = client.get_connection()?;

        Ok(RedisStore {
            url: url.to_owned(),
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| NosqlError::LockPoisoned.into())
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").field("url", &self.url).finish()
    }
}

impl KeyValueStore for RedisStore {
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.connection()?;
        conn.set::<_, _, ()>(key, value)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection()?;
        Ok(conn.get(key)?)
    }

    fn incr(&self, key: &str, by: i64) -> Result<i64> {
        let mut conn = self.connection()?;
        Ok(conn.incr(key, by)?)
    }

    fn rpush(&self, key: &str, value: Vec<u8>) -> Result<u64> {
        let mut conn = self.connection()?;
        Ok(conn.rpush(key, value)?)
    }

    fn lrange(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let mut conn = self.connection()?;
        Ok(conn.lrange(key, 0, -1)?)
    }

    fn flush(&self) -> Result<()> {
        let mut conn = self.connection()?;
        redis::cmd("FLUSHDB").query::<()>(&mut *conn)?;
        Ok(())
    }
}
