//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are RFC 3339 with fixed microsecond precision so that text
//! ordering matches time ordering. UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use keepsake_core::comment::{CommentRow, Person};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Person ───────────────────────────────────────────────────────────────────

pub fn encode_person(p: Person) -> &'static str { p.as_str() }

pub fn decode_person(s: &str) -> Result<Person> {
  s.parse().map_err(|_| Error::UnknownPerson(s.to_owned()))
}

// ─── Raw rows ─────────────────────────────────────────────────────────────────

/// An `anime_comments` row exactly as read from SQLite.
pub struct RawCommentRow {
  pub id:         String,
  pub anime_id:   String,
  pub person:     String,
  pub comment:    String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawCommentRow {
  pub const COLUMNS: &'static str = "id, anime_id, person, comment, created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      anime_id:   row.get(1)?,
      person:     row.get(2)?,
      comment:    row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_row(self) -> Result<CommentRow> {
    Ok(CommentRow {
      id:         decode_uuid(&self.id)?,
      anime_id:   self.anime_id,
      person:     decode_person(&self.person)?,
      comment:    self.comment,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_sort_as_text() {
    let a = Utc.with_ymd_and_hms(2025, 1, 8, 0, 0, 9).unwrap();
    let b = a + chrono::Duration::milliseconds(1_500);
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn unknown_person_is_rejected() {
    assert_eq!(decode_person("seiki").unwrap(), Person::Seiki);
    assert!(matches!(decode_person("nobody"), Err(Error::UnknownPerson(_))));
  }
}
