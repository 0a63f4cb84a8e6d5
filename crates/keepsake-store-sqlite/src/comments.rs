//! [`SqliteCommentTable`] — the SQLite implementation of [`CommentTable`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use keepsake_core::comment::{CommentFilter, CommentRow, CommentTable, NewComment, Person};
use tracing::debug;
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawCommentRow, encode_dt, encode_person, encode_uuid},
  error::Error,
  schema::COMMENTS_SCHEMA,
};

/// The `anime_comments` table backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteCommentTable {
  conn: tokio_rusqlite::Connection,
}

impl SqliteCommentTable {
  /// Open (or create) the table at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let table = Self { conn };
    table.init_schema().await?;
    Ok(table)
  }

  /// Open an in-memory table, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let table = Self { conn };
    table.init_schema().await?;
    Ok(table)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(COMMENTS_SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CommentTable impl ───────────────────────────────────────────────────────

impl CommentTable for SqliteCommentTable {
  type Error = Error;

  async fn select(&self, filter: &CommentFilter) -> Result<Vec<CommentRow>> {
    let anime_id = filter.anime_id.clone();
    let person = filter.person.map(encode_person);
    // SQLite treats a negative LIMIT as "no limit".
    let limit = filter.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));

    let raws: Vec<RawCommentRow> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM anime_comments
           WHERE (?1 IS NULL OR anime_id = ?1)
             AND (?2 IS NULL OR person = ?2)
           ORDER BY created_at ASC, rowid ASC
           LIMIT ?3",
          RawCommentRow::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![anime_id, person, limit], RawCommentRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCommentRow::into_row).collect()
  }

  async fn insert(&self, input: NewComment) -> Result<CommentRow> {
    // Stored timestamps carry microseconds; keep the returned row identical.
    let now = Utc::now().trunc_subsecs(6);
    let row = CommentRow {
      id:         Uuid::new_v4(),
      anime_id:   input.anime_id,
      person:     input.person,
      comment:    input.comment,
      created_at: now,
      updated_at: now,
    };

    let id_str     = encode_uuid(row.id);
    let anime_id   = row.anime_id.clone();
    let person_str = encode_person(row.person);
    let comment    = row.comment.clone();
    let at_str     = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO anime_comments (id, anime_id, person, comment, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, anime_id, person_str, comment, at_str],
        )?;
        Ok(())
      })
      .await?;

    debug!(anime = %row.anime_id, person = person_str, "inserted comment row");
    Ok(row)
  }

  async fn update(&self, anime_id: &str, person: Person, comment: String) -> Result<Vec<CommentRow>> {
    let anime_id   = anime_id.to_owned();
    let person_str = encode_person(person);
    let at_str     = encode_dt(Utc::now().trunc_subsecs(6));

    let raws: Vec<RawCommentRow> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE anime_comments SET comment = ?1, updated_at = ?2
           WHERE anime_id = ?3 AND person = ?4",
          rusqlite::params![comment, at_str, anime_id, person_str],
        )?;
        let rows = if changed == 0 {
          Vec::new()
        } else {
          let sql = format!(
            "SELECT {} FROM anime_comments
             WHERE anime_id = ?1 AND person = ?2
             ORDER BY created_at ASC, rowid ASC",
            RawCommentRow::COLUMNS
          );
          let mut stmt = tx.prepare(&sql)?;
          let rows = stmt
            .query_map(rusqlite::params![anime_id, person_str], RawCommentRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          drop(stmt);
          rows
        };
        tx.commit()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCommentRow::into_row).collect()
  }
}
