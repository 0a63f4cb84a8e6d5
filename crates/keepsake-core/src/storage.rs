//! The `DurableStorage` trait and an in-memory backend.
//!
//! A backend is a flat string-to-string map, the shape of a browser's local
//! storage. Backends report failures honestly; swallowing them is the job of
//! [`LocalStore`](crate::local::LocalStore).

use std::{
  collections::HashMap,
  sync::{Mutex, MutexGuard},
};

use thiserror::Error;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable string key-value backend.
///
/// Calls are synchronous: every local write is immediately consistent with
/// the in-memory state that triggered it.
pub trait DurableStorage: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the raw stored string for `key`, or `None` if absent.
  fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Store `value` under `key`, replacing any previous value.
  fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error>;

  /// Delete `key`. Deleting an absent key is not an error.
  fn remove_item(&self, key: &str) -> Result<(), Self::Error>;
}

// ─── MemoryStorage ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryStorageError {
  #[error("storage is disabled")]
  Disabled,

  #[error("quota of {limit} bytes exceeded")]
  QuotaExceeded { limit: usize },
}

#[derive(Debug, Default)]
struct Inner {
  items:    HashMap<String, String>,
  disabled: bool,
  quota:    Option<usize>,
}

impl Inner {
  fn used_without(&self, key: &str) -> usize {
    self
      .items
      .iter()
      .filter(|(k, _)| k.as_str() != key)
      .map(|(k, v)| k.len() + v.len())
      .sum()
  }
}

/// A process-local backend used in tests and as the ephemeral fallback.
///
/// It can be switched into a disabled mode (every call fails) or given a
/// byte quota (writes that would exceed it fail), to exercise the degraded
/// paths of [`LocalStore`](crate::local::LocalStore).
#[derive(Debug, Default)]
pub struct MemoryStorage {
  inner: Mutex<Inner>,
}

impl MemoryStorage {
  pub fn new() -> Self { Self::default() }

  /// A backend whose writes fail once keys plus values exceed `limit` bytes.
  pub fn with_quota(limit: usize) -> Self {
    let storage = Self::default();
    storage.lock().quota = Some(limit);
    storage
  }

  /// Make every subsequent call fail (or succeed again with `false`).
  pub fn set_disabled(&self, disabled: bool) { self.lock().disabled = disabled; }

  pub fn len(&self) -> usize { self.lock().items.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl DurableStorage for MemoryStorage {
  type Error = MemoryStorageError;

  fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
    let inner = self.lock();
    if inner.disabled {
      return Err(MemoryStorageError::Disabled);
    }
    Ok(inner.items.get(key).cloned())
  }

  fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
    let mut inner = self.lock();
    if inner.disabled {
      return Err(MemoryStorageError::Disabled);
    }
    if let Some(limit) = inner.quota
      && inner.used_without(key) + key.len() + value.len() > limit
    {
      return Err(MemoryStorageError::QuotaExceeded { limit });
    }
    inner.items.insert(key.to_owned(), value.to_owned());
    Ok(())
  }

  fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
    let mut inner = self.lock();
    if inner.disabled {
      return Err(MemoryStorageError::Disabled);
    }
    inner.items.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_get_remove() {
    let s = MemoryStorage::new();
    assert_eq!(s.get_item("a").unwrap(), None);
    s.set_item("a", "1").unwrap();
    assert_eq!(s.get_item("a").unwrap().as_deref(), Some("1"));
    s.remove_item("a").unwrap();
    assert_eq!(s.get_item("a").unwrap(), None);
    // Removing again is fine.
    s.remove_item("a").unwrap();
  }

  #[test]
  fn disabled_fails_every_call() {
    let s = MemoryStorage::new();
    s.set_item("a", "1").unwrap();
    s.set_disabled(true);
    assert!(matches!(s.get_item("a"), Err(MemoryStorageError::Disabled)));
    assert!(matches!(s.set_item("a", "2"), Err(MemoryStorageError::Disabled)));
    assert!(matches!(s.remove_item("a"), Err(MemoryStorageError::Disabled)));
    s.set_disabled(false);
    assert_eq!(s.get_item("a").unwrap().as_deref(), Some("1"));
  }

  #[test]
  fn quota_counts_replaced_value_once() {
    let s = MemoryStorage::with_quota(8);
    s.set_item("k", "1234").unwrap();
    // Replacing the same key only counts the new value.
    s.set_item("k", "1234567").unwrap();
    assert!(matches!(
      s.set_item("other", "x"),
      Err(MemoryStorageError::QuotaExceeded { limit: 8 })
    ));
    assert_eq!(s.len(), 1);
  }
}
