//! An append-only, de-duplicated set of string ids.
//!
//! Backs the gacha collection and the quiz answered set.
//! The set only shrinks through [`UnlockSet::reset`].

use crate::{key::StorageKey, local::LocalStore, storage::DurableStorage};

pub struct UnlockSet<B> {
  store: LocalStore<B>,
  key:   StorageKey,
  ids:   Vec<String>,
}

impl<B: DurableStorage> UnlockSet<B> {
  pub fn open(store: LocalStore<B>, key: StorageKey) -> Self {
    let ids = store.read(key, Vec::new());
    Self { store, key, ids }
  }

  /// Add `id` if absent and persist. Returns `true` if it was new.
  pub fn insert(&mut self, id: &str) -> bool {
    if self.contains(id) {
      return false;
    }
    self.ids.push(id.to_owned());
    self.store.write(self.key, &self.ids);
    true
  }

  pub fn contains(&self, id: &str) -> bool { self.ids.iter().any(|i| i == id) }

  pub fn reset(&mut self) {
    self.ids.clear();
    self.store.write(self.key, &self.ids);
  }

  pub fn len(&self) -> usize { self.ids.len() }

  pub fn is_empty(&self) -> bool { self.ids.is_empty() }

  /// Ids in unlock order.
  pub fn ids(&self) -> &[String] { &self.ids }
}
