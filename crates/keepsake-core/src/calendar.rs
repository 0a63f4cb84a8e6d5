//! The memories calendar.
//!
//! Storage order is insertion order; display order is always date-ascending.
//! Seeded memories carry no `id` and cannot be deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  key::StorageKey,
  local::LocalStore,
  session::Language,
  storage::DurableStorage,
};

// ─── Event ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
  /// ISO 8601 calendar date, `YYYY-MM-DD`.
  pub date:        String,
  pub title:       String,
  #[serde(default)]
  pub description: String,
  /// Creation time in milliseconds. Present only on user-added events.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:          Option<i64>,
}

impl CalendarEvent {
  fn seeded(date: &str, title: &str, description: &str) -> Self {
    Self {
      date:        date.to_owned(),
      title:       title.to_owned(),
      description: description.to_owned(),
      id:          None,
    }
  }

  pub fn is_user_added(&self) -> bool { self.id.is_some() }
}

/// Input for [`Calendar::add`].
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
  pub date:        String,
  pub title:       String,
  pub description: String,
}

/// The bundled memories for `language`.
pub fn seed_events(language: Language) -> Vec<CalendarEvent> {
  let rows: &[(&str, &str, &str)] = match language {
    Language::Zh => &[
      ("2024-08-18", "添加好友", "我们第一次相遇 💫"),
      ("2024-11-05", "Seiki的生日", "特别的生日 🎂"),
      ("2024-12-11", "Confession（告白）", "勇敢说出心意的那一天 💕"),
      ("2025-01-08", "在一起", "爱情的开始 💕"),
      ("2025-01-08", "第一次见面开始", "2025.1.8-1.14 第一次见面 ✈️"),
      ("2025-04-17", "第二次见面开始", "2025.4.17-4.24 第二次见面 ✈️"),
      ("2025-04-18", "恋爱一百天", "我们在一起100天了！🎉"),
      ("2025-06-25", "第三次见面开始", "2025.6.25-7.2 第三次见面 ✈️"),
      ("2025-07-27", "恋爱两百天", "我们在一起200天了！🎊"),
      ("2025-08-04", "生日快乐", "特别的日子 🎂"),
    ],
    Language::Ja => &[
      ("2024-08-18", "友達追加", "私たちの初めての出会い 💫"),
      ("2024-11-05", "Seikiの誕生日", "特別な誕生日 🎂"),
      ("2024-12-11", "告白", "勇気を出して気持ちを伝えた日 💕"),
      ("2025-01-08", "付き合い開始", "愛の始まり 💕"),
      ("2025-01-08", "初めての会う開始", "2025.1.8-1.14 初めての会う ✈️"),
      ("2025-04-17", "二回目の会う開始", "2025.4.17-4.24 二回目の会う ✈️"),
      ("2025-04-18", "恋愛100日", "私たちが付き合って100日になりました！🎉"),
      ("2025-06-25", "三回目の会う開始", "2025.6.25-7.2 三回目の会う ✈️"),
      ("2025-07-27", "恋愛200日", "私たちが付き合って200日になりました！🎊"),
      ("2025-08-04", "誕生日おめでとう", "特別な日 🎂"),
    ],
    Language::En => &[
      ("2024-08-18", "Added Friend", "Our first encounter 💫"),
      ("2024-11-05", "Seiki's Birthday", "Special birthday 🎂"),
      ("2024-12-11", "Confession", "The day we bravely expressed our feelings 💕"),
      ("2025-01-08", "Started Dating", "The beginning of love 💕"),
      ("2025-01-08", "First Meeting Start", "2025.1.8-1.14 First meeting ✈️"),
      ("2025-04-17", "Second Meeting Start", "2025.4.17-4.24 Second meeting ✈️"),
      ("2025-04-18", "100 Days in Love", "We've been together for 100 days! 🎉"),
      ("2025-06-25", "Third Meeting Start", "2025.6.25-7.2 Third meeting ✈️"),
      ("2025-07-27", "200 Days in Love", "We've been together for 200 days! 🎊"),
      ("2025-08-04", "Happy Birthday", "Special day 🎂"),
    ],
  };
  rows.iter().map(|(d, t, desc)| CalendarEvent::seeded(d, t, desc)).collect()
}

// ─── Calendar ────────────────────────────────────────────────────────────────

pub struct Calendar<B> {
  store:  LocalStore<B>,
  events: Vec<CalendarEvent>,
}

impl<B: DurableStorage> Calendar<B> {
  /// Load stored events, or the seeded memories for `language` if none.
  pub fn open(store: LocalStore<B>, language: Language) -> Self {
    let events = store.read(StorageKey::CalendarEvents, seed_events(language));
    Self { store, events }
  }

  /// Append a user event stamped with `now_ms`. Events without a date or
  /// title are ignored and `None` is returned.
  pub fn add(&mut self, input: NewEvent, now_ms: i64) -> Option<&CalendarEvent> {
    if input.date.trim().is_empty() || input.title.trim().is_empty() {
      return None;
    }

    // Two adds within the same millisecond still get distinct ids.
    let max_id = self.events.iter().filter_map(|e| e.id).max();
    let id = match max_id {
      Some(max) if max >= now_ms => max + 1,
      _ => now_ms,
    };

    self.events.push(CalendarEvent {
      date:        input.date,
      title:       input.title,
      description: input.description,
      id:          Some(id),
    });
    self.store.write(StorageKey::CalendarEvents, &self.events);
    self.events.last()
  }

  /// Delete the user event with `id`. Returns `false` if none matched.
  pub fn delete(&mut self, id: i64) -> bool {
    let before = self.events.len();
    self.events.retain(|e| e.id != Some(id));
    if self.events.len() == before {
      return false;
    }
    self.store.write(StorageKey::CalendarEvents, &self.events);
    true
  }

  /// Events in storage (insertion) order.
  pub fn events(&self) -> &[CalendarEvent] { &self.events }

  /// Events in display order: ascending by date, stable for equal dates.
  ///
  /// Dates that do not parse as `YYYY-MM-DD` sort after every parsed date,
  /// by their raw text.
  pub fn sorted(&self) -> Vec<&CalendarEvent> {
    let mut sorted: Vec<&CalendarEvent> = self.events.iter().collect();
    sorted.sort_by(|a, b| DateKey::of(a).cmp(&DateKey::of(b)));
    sorted
  }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey<'a> {
  Parsed(NaiveDate),
  Raw(&'a str),
}

impl<'a> DateKey<'a> {
  fn of(event: &'a CalendarEvent) -> Self {
    let date = event.date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_or(Self::Raw(date), Self::Parsed)
  }
}
