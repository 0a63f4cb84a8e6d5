//! JSON-aware, never-failing access to a durable backend.
//!
//! Reads fall back to the caller's default when the key is absent, the
//! backend is unavailable, or the stored text does not decode. Writes and
//! removals log failures and report a [`Persist`] outcome that callers are
//! free to ignore; in-memory state is never rolled back.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use strum::IntoEnumIterator as _;
use tracing::{debug, warn};

use crate::{key::StorageKey, storage::DurableStorage};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What happened to a write or removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
  /// The backend accepted the change.
  Stored,
  /// No backend is attached; the change lives only in memory.
  Unavailable,
  /// The backend rejected the change (quota, disabled, I/O). Already logged.
  Failed,
}

impl Persist {
  pub fn is_stored(self) -> bool { matches!(self, Self::Stored) }

  /// Combine two outcomes, keeping the worse one.
  pub fn and(self, other: Persist) -> Persist {
    match (self, other) {
      (Self::Failed, _) | (_, Self::Failed) => Self::Failed,
      (Self::Unavailable, _) | (_, Self::Unavailable) => Self::Unavailable,
      _ => Self::Stored,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The local durable state store shared by every page.
///
/// One instance is created at startup and handed to each page by value;
/// cloning is cheap because the backend is reference-counted. A store built
/// with [`LocalStore::unavailable`] behaves like a server-side render: reads
/// return defaults and writes are no-ops.
pub struct LocalStore<B> {
  backend: Option<Arc<B>>,
}

impl<B> Clone for LocalStore<B> {
  fn clone(&self) -> Self { Self { backend: self.backend.clone() } }
}

impl<B: DurableStorage> LocalStore<B> {
  pub fn new(backend: B) -> Self { Self { backend: Some(Arc::new(backend)) } }

  pub fn from_shared(backend: Arc<B>) -> Self { Self { backend: Some(backend) } }

  /// A store with no durable backend at all.
  pub fn unavailable() -> Self { Self { backend: None } }

  pub fn is_available(&self) -> bool { self.backend.is_some() }

  pub fn backend(&self) -> Option<&B> { self.backend.as_deref() }

  /// Decode the value stored under `key`, or return `default`.
  pub fn read<T: DeserializeOwned>(&self, key: StorageKey, default: T) -> T {
    let Some(backend) = &self.backend else {
      return default;
    };

    let raw = match backend.get_item(key.as_str()) {
      Ok(Some(raw)) if !raw.is_empty() => raw,
      Ok(_) => return default,
      Err(e) => {
        warn!(key = key.as_str(), error = %e, "local storage read failed");
        return default;
      }
    };

    match serde_json::from_str(&raw) {
      Ok(value) => value,
      Err(e) => {
        debug!(key = key.as_str(), error = %e, "discarding undecodable stored value");
        default
      }
    }
  }

  /// Encode `value` as JSON and store it under `key`.
  pub fn write<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Persist {
    let Some(backend) = &self.backend else {
      return Persist::Unavailable;
    };

    let json = match serde_json::to_string(value) {
      Ok(json) => json,
      Err(e) => {
        warn!(key = key.as_str(), error = %e, "failed to encode value for local storage");
        return Persist::Failed;
      }
    };

    match backend.set_item(key.as_str(), &json) {
      Ok(()) => {
        debug!(key = key.as_str(), bytes = json.len(), "saved to local storage");
        Persist::Stored
      }
      Err(e) => {
        warn!(key = key.as_str(), error = %e, "failed to save to local storage");
        Persist::Failed
      }
    }
  }

  pub fn remove(&self, key: StorageKey) -> Persist {
    let Some(backend) = &self.backend else {
      return Persist::Unavailable;
    };

    match backend.remove_item(key.as_str()) {
      Ok(()) => Persist::Stored,
      Err(e) => {
        warn!(key = key.as_str(), error = %e, "failed to remove from local storage");
        Persist::Failed
      }
    }
  }

  /// Remove every key in [`StorageKey`]. Irreversible.
  pub fn clear_all(&self) -> Persist {
    StorageKey::iter().fold(Persist::Stored, |acc, key| acc.and(self.remove(key)))
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use super::*;
  use crate::storage::MemoryStorage;

  fn store() -> LocalStore<MemoryStorage> { LocalStore::new(MemoryStorage::new()) }

  #[test]
  fn read_absent_returns_default() {
    let s = store();
    assert!(!s.read(StorageKey::CandleBlown, false));
    assert_eq!(s.read(StorageKey::Language, "zh".to_string()), "zh");
  }

  #[test]
  fn write_then_read_every_key() {
    let s = store();
    for key in StorageKey::iter() {
      let value = vec![key.as_str().to_string(), "x".to_string()];
      assert_eq!(s.write(key, &value), Persist::Stored);
      assert_eq!(s.read::<Vec<String>>(key, vec![]), value);
    }
  }

  #[test]
  fn structured_values_round_trip() {
    let s = store();
    let mut flags = BTreeMap::new();
    flags.insert("a".to_string(), true);
    flags.insert("b".to_string(), false);
    s.write(StorageKey::AnimeComments, &flags);
    assert_eq!(s.read(StorageKey::AnimeComments, BTreeMap::new()), flags);
  }

  #[test]
  fn corrupt_value_degrades_to_default() {
    let s = store();
    s.backend().unwrap().set_item(StorageKey::TodoStates.as_str(), "{not json").unwrap();
    assert_eq!(s.read(StorageKey::TodoStates, vec![false; 3]), vec![false; 3]);
  }

  #[test]
  fn wrong_shape_degrades_to_default() {
    let s = store();
    s.write(StorageKey::CandleBlown, "yes");
    assert!(!s.read(StorageKey::CandleBlown, false));
  }

  #[test]
  fn empty_string_is_treated_as_absent() {
    let s = store();
    s.backend().unwrap().set_item(StorageKey::LastVisit.as_str(), "").unwrap();
    assert_eq!(s.read(StorageKey::LastVisit, "never".to_string()), "never");
  }

  #[test]
  fn disabled_backend_reads_default_and_writes_fail_quietly() {
    let s = store();
    s.write(StorageKey::CandleBlown, &true);
    s.backend().unwrap().set_disabled(true);

    assert!(!s.read(StorageKey::CandleBlown, false));
    assert_eq!(s.write(StorageKey::CandleBlown, &true), Persist::Failed);
    assert_eq!(s.remove(StorageKey::CandleBlown), Persist::Failed);
  }

  #[test]
  fn quota_failure_is_reported_not_raised() {
    let s = LocalStore::new(MemoryStorage::with_quota(32));
    let big = vec!["melon-soda"; 20];
    assert_eq!(s.write(StorageKey::GachaCollected, &big), Persist::Failed);
    assert_eq!(s.read::<Vec<String>>(StorageKey::GachaCollected, vec![]), Vec::<String>::new());
  }

  #[test]
  fn unavailable_store_is_a_no_op() {
    let s: LocalStore<MemoryStorage> = LocalStore::unavailable();
    assert_eq!(s.write(StorageKey::Language, "ja"), Persist::Unavailable);
    assert_eq!(s.read(StorageKey::Language, "zh".to_string()), "zh");
    assert_eq!(s.clear_all(), Persist::Unavailable);
  }

  #[test]
  fn clear_all_restores_every_default() {
    let s = store();
    for key in StorageKey::iter() {
      s.write(key, &1u32);
    }
    assert_eq!(s.clear_all(), Persist::Stored);
    for key in StorageKey::iter() {
      assert_eq!(s.read(key, 0u32), 0);
    }
    assert!(s.backend().unwrap().is_empty());
  }

  #[test]
  fn clones_share_the_backend() {
    let a = store();
    let b = a.clone();
    a.write(StorageKey::CandleBlown, &true);
    assert!(b.read(StorageKey::CandleBlown, false));
  }

  #[test]
  fn persist_and_keeps_the_worse_outcome() {
    assert_eq!(Persist::Stored.and(Persist::Stored), Persist::Stored);
    assert_eq!(Persist::Stored.and(Persist::Unavailable), Persist::Unavailable);
    assert_eq!(Persist::Unavailable.and(Persist::Failed), Persist::Failed);
  }
}
