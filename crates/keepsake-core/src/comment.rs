//! Anime comment rows and the `CommentTable` trait.
//!
//! The trait is the remote table as seen from the app: a row-oriented
//! `anime_comments` table with select, insert and update. It is implemented
//! by `keepsake-store-sqlite` (server side) and by the HTTP client in
//! `keepsake-cli`. Nothing here enforces one row per (anime, person).

use std::{
  future::Future,
  sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;
use uuid::Uuid;

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// The anime on the shared watch log.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
pub enum AnimeId {
  #[serde(rename = "legend-of-hei-tv")]
  #[strum(serialize = "legend-of-hei-tv")]
  LegendOfHeiTv,
  #[serde(rename = "legend-of-hei-movie")]
  #[strum(serialize = "legend-of-hei-movie")]
  LegendOfHeiMovie,
  #[serde(rename = "dr-stone-s2")]
  #[strum(serialize = "dr-stone-s2")]
  DrStoneS2,
  #[serde(rename = "dr-stone-s3")]
  #[strum(serialize = "dr-stone-s3")]
  DrStoneS3,
  #[serde(rename = "dr-stone-s4-part1")]
  #[strum(serialize = "dr-stone-s4-part1")]
  DrStoneS4Part1,
  #[serde(rename = "5cm-per-second")]
  #[strum(serialize = "5cm-per-second")]
  FiveCentimetersPerSecond,
  #[serde(rename = "steins-gate")]
  #[strum(serialize = "steins-gate")]
  SteinsGate,
  #[serde(rename = "hunter-x-hunter")]
  #[strum(serialize = "hunter-x-hunter")]
  HunterXHunter,
  #[serde(rename = "chiikawa")]
  #[strum(serialize = "chiikawa")]
  Chiikawa,
  #[serde(rename = "dr-stone-s4-part2")]
  #[strum(serialize = "dr-stone-s4-part2")]
  DrStoneS4Part2,
  #[serde(rename = "demon-slayer")]
  #[strum(serialize = "demon-slayer")]
  DemonSlayer,
}

impl AnimeId {
  pub fn as_str(self) -> &'static str { self.into() }
}

/// One of the two fixed authors.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
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
pub enum Person {
  Seiki,
  Ryoma,
}

impl Person {
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A stored `anime_comments` row.
///
/// `anime_id` stays a string so rows for anime outside [`AnimeId`] still
/// load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRow {
  pub id:         Uuid,
  pub anime_id:   String,
  pub person:     Person,
  pub comment:    String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input for [`CommentTable::insert`]. Timestamps are assigned by the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
  pub anime_id: String,
  pub person:   Person,
  pub comment:  String,
}

/// Parameters for [`CommentTable::select`]. Empty means every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFilter {
  pub anime_id: Option<String>,
  pub person:   Option<Person>,
  pub limit:    Option<usize>,
}

impl CommentFilter {
  pub fn pair(anime_id: &str, person: Person) -> Self {
    Self { anime_id: Some(anime_id.to_owned()), person: Some(person), limit: None }
  }

  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  pub fn matches(&self, row: &CommentRow) -> bool {
    self.anime_id.as_deref().is_none_or(|a| a == row.anime_id)
      && self.person.is_none_or(|p| p == row.person)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the `anime_comments` table.
///
/// All methods return `Send` futures so the trait can be used behind axum
/// handlers.
pub trait CommentTable: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Rows matching `filter`, ascending by `created_at`.
  fn select<'a>(
    &'a self,
    filter: &'a CommentFilter,
  ) -> impl Future<Output = Result<Vec<CommentRow>, Self::Error>> + Send + 'a;

  /// Insert a new row. Both timestamps are set to now.
  fn insert(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<CommentRow, Self::Error>> + Send + '_;

  /// Overwrite the text of every row for (`anime_id`, `person`) and refresh
  /// `updated_at`. Returns the updated rows, empty if none matched.
  fn update<'a>(
    &'a self,
    anime_id: &'a str,
    person: Person,
    comment: String,
  ) -> impl Future<Output = Result<Vec<CommentRow>, Self::Error>> + Send + 'a;
}

// ─── MemoryCommentTable ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryTableError {
  #[error("table is offline")]
  Offline,
}

#[derive(Debug, Default)]
struct TableState {
  rows:    Vec<CommentRow>,
  offline: bool,
}

/// An in-process `anime_comments` table for tests.
#[derive(Debug, Default)]
pub struct MemoryCommentTable {
  state: Mutex<TableState>,
}

impl MemoryCommentTable {
  pub fn new() -> Self { Self::default() }

  /// Make every call fail with [`MemoryTableError::Offline`].
  pub fn set_offline(&self, offline: bool) { self.lock().offline = offline; }

  /// All rows in insertion order.
  pub fn rows(&self) -> Vec<CommentRow> { self.lock().rows.clone() }

  fn lock(&self) -> MutexGuard<'_, TableState> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  fn online(&self) -> Result<MutexGuard<'_, TableState>, MemoryTableError> {
    let state = self.lock();
    if state.offline { Err(MemoryTableError::Offline) } else { Ok(state) }
  }
}

impl CommentTable for MemoryCommentTable {
  type Error = MemoryTableError;

  async fn select(&self, filter: &CommentFilter) -> Result<Vec<CommentRow>, Self::Error> {
    let state = self.online()?;
    let mut rows: Vec<CommentRow> =
      state.rows.iter().filter(|r| filter.matches(r)).cloned().collect();
    rows.sort_by_key(|r| r.created_at);
    if let Some(limit) = filter.limit {
      rows.truncate(limit);
    }
    Ok(rows)
  }

  async fn insert(&self, input: NewComment) -> Result<CommentRow, Self::Error> {
    let mut state = self.online()?;
    let now = Utc::now();
    let row = CommentRow {
      id:         Uuid::new_v4(),
      anime_id:   input.anime_id,
      person:     input.person,
      comment:    input.comment,
      created_at: now,
      updated_at: now,
    };
    state.rows.push(row.clone());
    Ok(row)
  }

  async fn update(
    &self,
    anime_id: &str,
    person: Person,
    comment: String,
  ) -> Result<Vec<CommentRow>, Self::Error> {
    let mut state = self.online()?;
    let now = Utc::now();
    let updated = state
      .rows
      .iter_mut()
      .filter(|r| r.anime_id == anime_id && r.person == person)
      .map(|r| {
        r.comment = comment.clone();
        r.updated_at = now;
        r.clone()
      })
      .collect();
    Ok(updated)
  }
}
