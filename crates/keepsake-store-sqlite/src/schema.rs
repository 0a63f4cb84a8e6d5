//! SQL schemas for the Keepsake SQLite stores.
//!
//! Both are idempotent thanks to `CREATE TABLE IF NOT EXISTS` and may share
//! one database file.

/// Durable key-value store: one row per local storage key.
pub const KV_SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS local_storage (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);
";

/// Shared anime comments.
///
/// There is no UNIQUE (anime_id, person) constraint; writers
/// select first and then update or insert.
pub const COMMENTS_SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS anime_comments (
    id          TEXT PRIMARY KEY,
    anime_id    TEXT NOT NULL,
    person      TEXT NOT NULL,   -- 'seiki' | 'ryoma'
    comment     TEXT NOT NULL,
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC, fixed microsecond precision
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS anime_comments_pair_idx    ON anime_comments(anime_id, person);
CREATE INDEX IF NOT EXISTS anime_comments_created_idx ON anime_comments(created_at);

PRAGMA user_version = 1;
";
