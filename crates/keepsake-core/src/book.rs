//! [`CommentBook`] — the app-side mirror of the shared anime comments.
//!
//! Loading folds every row into `anime_id → { seiki, ryoma }`. Saving is an
//! optimistic check-then-branch upsert: select the (anime, person) row, then
//! update it or insert a new one. The two steps are not atomic, so two
//! sessions saving the same pair at once can both insert.
//!
//! Failures never propagate. They land in [`SyncStatus::Failed`] and leave
//! the in-memory map as it was.

use std::{
  collections::BTreeMap,
  sync::Arc,
  time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
  comment::{AnimeId, CommentFilter, CommentRow, CommentTable, NewComment, Person},
  key::StorageKey,
  local::LocalStore,
  storage::DurableStorage,
};

/// How long the "saved" notice stays up.
pub const SAVED_NOTICE: Duration = Duration::from_secs(2);

// ─── Pair ────────────────────────────────────────────────────────────────────

/// Both authors' text for one anime. A missing author is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPair {
  #[serde(default)]
  pub seiki: String,
  #[serde(default)]
  pub ryoma: String,
}

impl CommentPair {
  pub fn get(&self, person: Person) -> &str {
    match person {
      Person::Seiki => &self.seiki,
      Person::Ryoma => &self.ryoma,
    }
  }

  pub fn set(&mut self, person: Person, text: String) {
    match person {
      Person::Seiki => self.seiki = text,
      Person::Ryoma => self.ryoma = text,
    }
  }
}

/// Fold rows (ascending by creation) into the nested map. Later rows for the
/// same pair win.
pub fn fold_rows(rows: &[CommentRow]) -> BTreeMap<String, CommentPair> {
  let mut comments: BTreeMap<String, CommentPair> = BTreeMap::new();
  for row in rows {
    comments
      .entry(row.anime_id.clone())
      .or_default()
      .set(row.person, row.comment.clone());
  }
  comments
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// The tri-state of the most recent remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncStatus {
  #[default]
  Idle,
  Loading,
  Saving,
  /// The last operation failed; the message is shown with a retry action.
  Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
  /// The remote row was updated or inserted.
  Saved,
  /// The trimmed text was empty; nothing happened.
  Rejected,
  /// The remote call failed; see [`CommentBook::status`].
  Failed,
}

/// The one comment slot currently open for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSlot {
  pub anime_id: AnimeId,
  pub person:   Person,
  pub draft:    String,
}

// ─── Book ────────────────────────────────────────────────────────────────────

pub struct CommentBook<T, B> {
  table:    Arc<T>,
  cache:    LocalStore<B>,
  comments: BTreeMap<String, CommentPair>,
  status:   SyncStatus,
  saved_at: Option<Instant>,
  editing:  Option<EditSlot>,
}

impl<T, B> CommentBook<T, B>
where
  T: CommentTable,
  B: DurableStorage,
{
  /// Create a book on `table`. The local copy in `cache` is shown until the
  /// first successful load replaces it.
  pub fn new(table: Arc<T>, cache: LocalStore<B>) -> Self {
    let comments = cache.read(StorageKey::AnimeComments, BTreeMap::new());
    Self {
      table,
      cache,
      comments,
      status: SyncStatus::Idle,
      saved_at: None,
      editing: None,
    }
  }

  pub fn status(&self) -> &SyncStatus { &self.status }

  pub fn comments(&self) -> &BTreeMap<String, CommentPair> { &self.comments }

  /// The text for one slot, empty if nobody has written it yet.
  pub fn comment(&self, anime_id: AnimeId, person: Person) -> &str {
    self.comments.get(anime_id.as_str()).map_or("", |pair| pair.get(person))
  }

  /// Whether the "saved" notice should be visible at `now`.
  pub fn saved_notice(&self, now: Instant) -> bool {
    self.saved_at.is_some_and(|at| now.saturating_duration_since(at) < SAVED_NOTICE)
  }

  /// Fetch every row and replace the in-memory map. On failure the current
  /// map stays visible and the status carries the error. Calling this again
  /// is the retry action.
  pub async fn load_all(&mut self) {
    self.status = SyncStatus::Loading;
    match self.table.select(&CommentFilter::default()).await {
      Ok(rows) => {
        debug!(rows = rows.len(), "loaded anime comments");
        self.comments = fold_rows(&rows);
        self.cache.write(StorageKey::AnimeComments, &self.comments);
        self.status = SyncStatus::Idle;
      }
      Err(e) => {
        warn!(error = %e, "failed to load anime comments");
        self.status = SyncStatus::Failed(e.to_string());
      }
    }
  }

  /// Save `text` for (`anime_id`, `person`).
  pub async fn save_comment(&mut self, anime_id: AnimeId, person: Person, text: &str) -> SaveOutcome {
    if text.trim().is_empty() {
      return SaveOutcome::Rejected;
    }

    self.status = SyncStatus::Saving;
    match self.upsert(anime_id, person, text).await {
      Ok(()) => {
        self
          .comments
          .entry(anime_id.as_str().to_owned())
          .or_default()
          .set(person, text.to_owned());
        self.cache.write(StorageKey::AnimeComments, &self.comments);
        self.saved_at = Some(Instant::now());
        self.status = SyncStatus::Idle;
        SaveOutcome::Saved
      }
      Err(e) => {
        warn!(anime = anime_id.as_str(), person = person.as_str(), error = %e, "failed to save comment");
        self.status = SyncStatus::Failed(e.to_string());
        SaveOutcome::Failed
      }
    }
  }

  async fn upsert(&self, anime_id: AnimeId, person: Person, text: &str) -> Result<(), T::Error> {
    let filter = CommentFilter::pair(anime_id.as_str(), person).limit(1);
    let existing = self.table.select(&filter).await?;

    if existing.is_empty() {
      self
        .table
        .insert(NewComment {
          anime_id: anime_id.as_str().to_owned(),
          person,
          comment: text.to_owned(),
        })
        .await?;
    } else {
      self.table.update(anime_id.as_str(), person, text.to_owned()).await?;
    }
    Ok(())
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  pub fn editing(&self) -> Option<&EditSlot> { self.editing.as_ref() }

  /// Open `anime_id`/`person` for editing with its current text as the
  /// draft. Any other open draft is discarded.
  pub fn begin_edit(&mut self, anime_id: AnimeId, person: Person) -> &mut EditSlot {
    let draft = self.comment(anime_id, person).to_owned();
    self.editing.insert(EditSlot { anime_id, person, draft })
  }

  /// Replace the open draft. No-op if nothing is being edited.
  pub fn set_draft(&mut self, text: impl Into<String>) {
    if let Some(slot) = &mut self.editing {
      slot.draft = text.into();
    }
  }

  /// Close the open slot, discarding its draft.
  pub fn cancel_edit(&mut self) { self.editing = None; }

  /// Save the open draft. The slot closes only when the save succeeds.
  pub async fn commit_edit(&mut self) -> SaveOutcome {
    let Some(slot) = self.editing.clone() else {
      return SaveOutcome::Rejected;
    };
    let outcome = self.save_comment(slot.anime_id, slot.person, &slot.draft).await;
    if outcome == SaveOutcome::Saved {
      self.editing = None;
    }
    outcome
  }
}
