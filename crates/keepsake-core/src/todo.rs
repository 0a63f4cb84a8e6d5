//! The future-activities checklist.
//!
//! One boolean per line. The last line is the "to be continued" placeholder
//! and can never be checked.

use crate::{key::StorageKey, local::LocalStore, storage::DurableStorage};

/// Number of real activities on the list.
pub const ACTIVITY_COUNT: usize = 68;

/// Stored slots: every activity plus the trailing placeholder.
pub const TODO_SLOTS: usize = ACTIVITY_COUNT + 1;

pub struct TodoList<B> {
  store:  LocalStore<B>,
  states: Vec<bool>,
}

impl<B: DurableStorage> TodoList<B> {
  /// Load the checklist with the standard number of slots.
  pub fn open(store: LocalStore<B>) -> Self { Self::with_slots(store, TODO_SLOTS) }

  /// Load a checklist of `slots` lines. A stored list of a different length
  /// is padded with `false` or truncated to fit.
  pub fn with_slots(store: LocalStore<B>, slots: usize) -> Self {
    let mut states: Vec<bool> = store.read(StorageKey::TodoStates, vec![false; slots]);
    states.resize(slots, false);
    Self { store, states }
  }

  /// Flip line `index` and persist. Returns the new state, or `None` for the
  /// placeholder and out-of-range indices.
  pub fn toggle(&mut self, index: usize) -> Option<bool> {
    if index >= self.checkable() {
      return None;
    }
    let state = self.states.get_mut(index)?;
    *state = !*state;
    let new_state = *state;
    self.store.write(StorageKey::TodoStates, &self.states);
    Some(new_state)
  }

  pub fn reset(&mut self) {
    self.states.iter_mut().for_each(|s| *s = false);
    self.store.write(StorageKey::TodoStates, &self.states);
  }

  pub fn completed(&self) -> usize { self.states.iter().filter(|s| **s).count() }

  /// Lines that can be checked (all but the placeholder).
  pub fn checkable(&self) -> usize { self.states.len().saturating_sub(1) }

  pub fn states(&self) -> &[bool] { &self.states }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStorage;

  #[test]
  fn toggle_then_reset_round_trips_through_storage() {
    let store = LocalStore::new(MemoryStorage::new());
    store.write(StorageKey::TodoStates, &[false, false]);

    let mut todo = TodoList::with_slots(store.clone(), 2);
    assert_eq!(todo.toggle(0), Some(true));
    assert_eq!(store.read::<Vec<bool>>(StorageKey::TodoStates, vec![]), [true, false]);

    todo.reset();
    assert_eq!(store.read::<Vec<bool>>(StorageKey::TodoStates, vec![]), [false, false]);
  }

  #[test]
  fn placeholder_and_out_of_range_are_ignored() {
    let store = LocalStore::new(MemoryStorage::new());
    let mut todo = TodoList::open(store.clone());
    assert_eq!(todo.toggle(TODO_SLOTS - 1), None);
    assert_eq!(todo.toggle(TODO_SLOTS + 5), None);
    assert_eq!(todo.toggle(usize::MAX), None);
    assert_eq!(todo.completed(), 0);
    // Nothing was written.
    assert!(store.backend().unwrap().is_empty());
  }

  #[test]
  fn default_is_all_unchecked() {
    let todo = TodoList::open(LocalStore::new(MemoryStorage::new()));
    assert_eq!(todo.states().len(), TODO_SLOTS);
    assert_eq!(todo.checkable(), ACTIVITY_COUNT);
    assert!(todo.states().iter().all(|s| !s));
  }

  #[test]
  fn toggle_twice_unchecks() {
    let mut todo = TodoList::open(LocalStore::new(MemoryStorage::new()));
    todo.toggle(3);
    todo.toggle(10);
    assert_eq!(todo.completed(), 2);
    assert_eq!(todo.toggle(3), Some(false));
    assert_eq!(todo.completed(), 1);
  }

  #[test]
  fn short_stored_list_is_padded() {
    let store = LocalStore::new(MemoryStorage::new());
    store.write(StorageKey::TodoStates, &[true]);
    let todo = TodoList::open(store);
    assert_eq!(todo.states().len(), TODO_SLOTS);
    assert!(todo.states()[0]);
    assert_eq!(todo.completed(), 1);
  }
}
