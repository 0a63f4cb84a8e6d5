//! Integration tests for the SQLite backends against in-memory databases.

use std::sync::Arc;

use keepsake_core::{
  DurableStorage,
  LocalStore,
  Persist,
  StorageKey,
  book::{CommentBook, SaveOutcome},
  comment::{AnimeId, CommentFilter, CommentTable, NewComment, Person},
  todo::TodoList,
};

use crate::{SqliteCommentTable, SqliteStorage};

async fn table() -> SqliteCommentTable {
  SqliteCommentTable::open_in_memory()
    .await
    .expect("in-memory table")
}

fn storage() -> SqliteStorage { SqliteStorage::open_in_memory().expect("in-memory storage") }

fn new_comment(anime: &str, person: Person, text: &str) -> NewComment {
  NewComment { anime_id: anime.into(), person, comment: text.into() }
}

// ─── Key-value storage ───────────────────────────────────────────────────────

#[test]
fn kv_set_get_remove() {
  let s = storage();
  assert_eq!(s.get_item("k").unwrap(), None);
  s.set_item("k", "1").unwrap();
  s.set_item("k", "2").unwrap();
  assert_eq!(s.get_item("k").unwrap().as_deref(), Some("2"));
  s.remove_item("k").unwrap();
  assert_eq!(s.get_item("k").unwrap(), None);
}

#[test]
fn local_store_over_sqlite_round_trips_and_clears() {
  let store = LocalStore::new(storage());
  assert_eq!(store.write(StorageKey::CandleBlown, &true), Persist::Stored);
  store.write(StorageKey::GachaCollected, &["melon-soda"]);
  assert!(store.read(StorageKey::CandleBlown, false));

  assert_eq!(store.clear_all(), Persist::Stored);
  assert!(!store.read(StorageKey::CandleBlown, false));
  assert!(store.backend().unwrap().keys().unwrap().is_empty());
}

#[test]
fn kv_survives_reopen() {
  let dir = std::env::temp_dir().join(format!("keepsake-test-{}", uuid::Uuid::new_v4()));
  let path = dir.join("state.db");

  {
    let store = LocalStore::new(SqliteStorage::open(&path).unwrap());
    let mut todo = TodoList::with_slots(store, 2);
    todo.toggle(0);
  }

  let store = LocalStore::new(SqliteStorage::open(&path).unwrap());
  assert_eq!(store.read::<Vec<bool>>(StorageKey::TodoStates, vec![]), [true, false]);

  std::fs::remove_dir_all(dir).ok();
}

// ─── Comment table ───────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_select_all_in_creation_order() {
  let t = table().await;
  t.insert(new_comment("chiikawa", Person::Seiki, "first")).await.unwrap();
  t.insert(new_comment("steins-gate", Person::Ryoma, "second")).await.unwrap();
  t.insert(new_comment("chiikawa", Person::Ryoma, "third")).await.unwrap();

  let rows = t.select(&CommentFilter::default()).await.unwrap();
  let texts: Vec<&str> = rows.iter().map(|r| r.comment.as_str()).collect();
  assert_eq!(texts, ["first", "second", "third"]);
  assert!(rows.iter().all(|r| r.created_at == r.updated_at));
}

#[tokio::test]
async fn select_filters_by_pair_and_limit() {
  let t = table().await;
  t.insert(new_comment("chiikawa", Person::Seiki, "a")).await.unwrap();
  t.insert(new_comment("chiikawa", Person::Ryoma, "b")).await.unwrap();
  t.insert(new_comment("chiikawa", Person::Seiki, "c")).await.unwrap();

  let pair = t.select(&CommentFilter::pair("chiikawa", Person::Seiki)).await.unwrap();
  assert_eq!(pair.len(), 2);
  assert!(pair.iter().all(|r| r.person == Person::Seiki));

  let one = t
    .select(&CommentFilter::pair("chiikawa", Person::Seiki).limit(1))
    .await
    .unwrap();
  assert_eq!(one.len(), 1);
  assert_eq!(one[0].comment, "a");

  let huge = t
    .select(&CommentFilter::pair("chiikawa", Person::Seiki).limit(usize::MAX))
    .await
    .unwrap();
  assert_eq!(huge.len(), 2);

  let zero = t
    .select(&CommentFilter::pair("chiikawa", Person::Seiki).limit(0))
    .await
    .unwrap();
  assert!(zero.is_empty());

  let by_person = t
    .select(&CommentFilter { person: Some(Person::Ryoma), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_person.len(), 1);
}

#[tokio::test]
async fn update_refreshes_text_and_timestamp() {
  let t = table().await;
  let inserted = t.insert(new_comment("demon-slayer", Person::Ryoma, "old")).await.unwrap();

  let updated = t.update("demon-slayer", Person::Ryoma, "new".into()).await.unwrap();
  assert_eq!(updated.len(), 1);
  assert_eq!(updated[0].id, inserted.id);
  assert_eq!(updated[0].comment, "new");
  assert_eq!(updated[0].created_at, inserted.created_at);
  assert!(updated[0].updated_at >= inserted.updated_at);
}

#[tokio::test]
async fn update_without_match_changes_nothing() {
  let t = table().await;
  let updated = t.update("chiikawa", Person::Seiki, "x".into()).await.unwrap();
  assert!(updated.is_empty());
  assert!(t.select(&CommentFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn table_allows_duplicate_pairs() {
  let t = table().await;
  t.insert(new_comment("chiikawa", Person::Seiki, "one")).await.unwrap();
  t.insert(new_comment("chiikawa", Person::Seiki, "two")).await.unwrap();
  let rows = t.select(&CommentFilter::pair("chiikawa", Person::Seiki)).await.unwrap();
  assert_eq!(rows.len(), 2);
}

// ─── Book over SQLite ────────────────────────────────────────────────────────

#[tokio::test]
async fn book_upsert_keeps_one_row_per_pair() {
  let t = Arc::new(table().await);
  let mut book = CommentBook::new(t.clone(), LocalStore::new(storage()));

  assert_eq!(book.save_comment(AnimeId::DrStoneS3, Person::Seiki, "ten billion").await, SaveOutcome::Saved);
  assert_eq!(book.save_comment(AnimeId::DrStoneS3, Person::Seiki, "percent").await, SaveOutcome::Saved);

  let rows = t.select(&CommentFilter::pair("dr-stone-s3", Person::Seiki)).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].comment, "percent");

  let mut fresh = CommentBook::new(t, LocalStore::new(storage()));
  fresh.load_all().await;
  assert_eq!(fresh.comment(AnimeId::DrStoneS3, Person::Seiki), "percent");
  assert_eq!(fresh.comment(AnimeId::DrStoneS3, Person::Ryoma), "");
}
