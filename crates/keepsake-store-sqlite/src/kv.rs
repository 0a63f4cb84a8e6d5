//! [`SqliteStorage`] — a durable key-value file for [`LocalStore`].
//!
//! Local storage is synchronous, so this uses a plain [`rusqlite`]
//! connection behind a mutex rather than the async wrapper.
//!
//! [`LocalStore`]: keepsake_core::LocalStore

use std::{
  path::Path,
  sync::{Mutex, MutexGuard},
};

use keepsake_core::DurableStorage;
use rusqlite::OptionalExtension as _;

use crate::{Result, schema::KV_SCHEMA};

pub struct SqliteStorage {
  conn: Mutex<rusqlite::Connection>,
}

impl SqliteStorage {
  /// Open (or create) a store at `path`, creating parent directories.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let conn = rusqlite::Connection::open(path)?;
    Self::init(conn)
  }

  /// Open an in-memory store, mainly for tests.
  pub fn open_in_memory() -> Result<Self> { Self::init(rusqlite::Connection::open_in_memory()?) }

  fn init(conn: rusqlite::Connection) -> Result<Self> {
    conn.execute_batch(KV_SCHEMA)?;
    Ok(Self { conn: Mutex::new(conn) })
  }

  fn lock(&self) -> MutexGuard<'_, rusqlite::Connection> {
    self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Every stored key, sorted.
  pub fn keys(&self) -> Result<Vec<String>> {
    let conn = self.lock();
    let mut stmt = conn.prepare("SELECT key FROM local_storage ORDER BY key")?;
    let keys = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(keys)
  }
}

impl DurableStorage for SqliteStorage {
  type Error = rusqlite::Error;

  fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
    self
      .lock()
      .query_row(
        "SELECT value FROM local_storage WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()
  }

  fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
    self.lock().execute(
      "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
       ON CONFLICT(key) DO UPDATE SET value = excluded.value",
      rusqlite::params![key, value],
    )?;
    Ok(())
  }

  fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
    self
      .lock()
      .execute("DELETE FROM local_storage WHERE key = ?1", rusqlite::params![key])?;
    Ok(())
  }
}
