//! Pages and the visited-pages log.
//!
//! The log is append-only and de-duplicated at append time: a page name is
//! appended on mount only if it is not already present. The per-page "visit
//! count" is the number of occurrences of the name, which in practice is 0
//! or 1 until the log is reset.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::{key::StorageKey, local::LocalStore, storage::DurableStorage};

/// The closed set of views the root component can select.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Page {
  #[default]
  Home,
  Map,
  Todo,
  Calendar,
  Anime,
  Quiz,
  Birthday,
  Cooking,
  Gacha,
}

impl Page {
  pub fn as_str(self) -> &'static str { self.into() }

  /// Whether mounting this page is recorded in the visited log.
  pub fn is_tracked(self) -> bool { !matches!(self, Self::Home) }
}

/// The in-memory copy of [`StorageKey::VisitedPages`].
///
/// Entries are kept as strings so names written by other builds survive a
/// round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitLog {
  entries: Vec<String>,
}

impl VisitLog {
  pub fn load<B: DurableStorage>(store: &LocalStore<B>) -> Self {
    Self { entries: store.read(StorageKey::VisitedPages, Vec::new()) }
  }

  /// Record that `page` was mounted. Returns `true` if an entry was appended.
  ///
  /// The updated log is persisted immediately.
  pub fn record<B: DurableStorage>(&mut self, store: &LocalStore<B>, page: Page) -> bool {
    if !page.is_tracked() || self.contains(page) {
      return false;
    }
    self.entries.push(page.as_str().to_owned());
    store.write(StorageKey::VisitedPages, &self.entries);
    true
  }

  pub fn contains(&self, page: Page) -> bool { self.entries.iter().any(|e| e == page.as_str()) }

  pub fn count(&self, page: Page) -> usize {
    self.entries.iter().filter(|e| *e == page.as_str()).count()
  }

  pub fn total(&self) -> usize { self.entries.len() }

  pub fn entries(&self) -> &[String] { &self.entries }

  pub fn clear(&mut self) { self.entries.clear(); }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStorage;

  #[test]
  fn page_names_are_lowercase() {
    assert_eq!(Page::Birthday.as_str(), "birthday");
    assert_eq!("gacha".parse::<Page>().unwrap(), Page::Gacha);
    assert!("nope".parse::<Page>().is_err());
  }

  #[test]
  fn mounting_twice_appends_once() {
    let store = LocalStore::new(MemoryStorage::new());
    let mut log = VisitLog::load(&store);

    assert!(log.record(&store, Page::Todo));
    assert!(!log.record(&store, Page::Todo));
    assert_eq!(log.count(Page::Todo), 1);

    let stored: Vec<String> = store.read(StorageKey::VisitedPages, vec![]);
    assert_eq!(stored, vec!["todo".to_string()]);
  }

  #[test]
  fn home_is_not_tracked() {
    let store = LocalStore::new(MemoryStorage::new());
    let mut log = VisitLog::default();
    assert!(!log.record(&store, Page::Home));
    assert_eq!(log.total(), 0);
  }

  #[test]
  fn order_is_first_visit_order() {
    let store = LocalStore::new(MemoryStorage::new());
    let mut log = VisitLog::load(&store);
    log.record(&store, Page::Quiz);
    log.record(&store, Page::Map);
    log.record(&store, Page::Quiz);
    assert_eq!(log.entries(), ["quiz", "map"]);

    // A fresh load sees the same log.
    assert_eq!(VisitLog::load(&store), log);
  }

  #[test]
  fn reset_allows_the_page_to_log_again() {
    let store = LocalStore::new(MemoryStorage::new());
    let mut log = VisitLog::load(&store);
    log.record(&store, Page::Anime);
    store.clear_all();
    log.clear();
    assert!(log.record(&store, Page::Anime));
    assert_eq!(log.count(Page::Anime), 1);
  }

  #[test]
  fn unknown_stored_names_are_kept() {
    let store = LocalStore::new(MemoryStorage::new());
    store.write(StorageKey::VisitedPages, &["legacy", "map"]);
    let mut log = VisitLog::load(&store);
    assert!(log.contains(Page::Map));
    log.record(&store, Page::Gacha);
    assert_eq!(log.entries(), ["legacy", "map", "gacha"]);
  }
}
