//! The root component: language preference, last-visit bookkeeping, the
//! page selector, and the global reset.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::info;

use crate::{
  key::StorageKey,
  local::{LocalStore, Persist},
  storage::DurableStorage,
  visits::{Page, VisitLog},
};

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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
  #[default]
  Zh,
  Ja,
  En,
}

/// App-wide state owned by the root view.
///
/// Exactly one page is current at a time. Pages receive a clone of
/// [`Session::store`] and the shared [`VisitLog`] when mounted.
pub struct Session<B> {
  store:          LocalStore<B>,
  language:       Language,
  previous_visit: String,
  visits:         VisitLog,
  page:           Page,
}

impl<B: DurableStorage> Session<B> {
  /// Load persisted preferences and stamp the current visit.
  ///
  /// `now_label` is the human-readable local time stored as the new last
  /// visit; the previously stored value is kept in [`Session::previous_visit`].
  pub fn start(store: LocalStore<B>, now_label: impl Into<String>) -> Self {
    let language = store.read(StorageKey::Language, Language::default());
    let previous_visit = store.read(StorageKey::LastVisit, String::new());
    let visits = VisitLog::load(&store);

    let now_label: String = now_label.into();
    store.write(StorageKey::LastVisit, &now_label);

    Self { store, language, previous_visit, visits, page: Page::Home }
  }

  pub fn store(&self) -> &LocalStore<B> { &self.store }

  pub fn language(&self) -> Language { self.language }

  pub fn set_language(&mut self, language: Language) -> Persist {
    self.language = language;
    self.store.write(StorageKey::Language, &language)
  }

  pub fn previous_visit(&self) -> &str { &self.previous_visit }

  pub fn visits(&self) -> &VisitLog { &self.visits }

  pub fn page(&self) -> Page { self.page }

  /// Switch to `page`, logging the first mount of each tracked page.
  pub fn navigate(&mut self, page: Page) {
    self.page = page;
    self.visits.record(&self.store, page);
  }

  /// Remove every stored key and reset the root state to its defaults.
  ///
  /// Callers are expected to have confirmed with the user first.
  pub fn clear_all(&mut self) -> Persist {
    let outcome = self.store.clear_all();
    self.language = Language::default();
    self.visits.clear();
    self.previous_visit.clear();
    self.page = Page::Home;
    info!(?outcome, "cleared all local data");
    outcome
  }
}
