//! The fixed, enumerated set of local storage keys.
//!
//! Keys are never user-generated. The string form is what lands in the
//! durable backend and stays stable across releases.

use strum::{AsRefStr, EnumIter, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, IntoStaticStr)]
pub enum StorageKey {
  /// `Language`, default `zh`.
  #[strum(serialize = "love-timer-language")]
  Language,
  /// `Vec<bool>`, one slot per checklist line.
  #[strum(serialize = "love-timer-todo-states")]
  TodoStates,
  /// `bool`.
  #[strum(serialize = "love-timer-candle-blown")]
  CandleBlown,
  /// `bool`. Kept so a reset clears it; no page writes it today.
  #[strum(serialize = "love-timer-music-playing")]
  MusicPlaying,
  /// `Vec<String>` of page names.
  #[strum(serialize = "love-timer-visited-pages")]
  VisitedPages,
  /// `String`, human-readable local time of the previous start.
  #[strum(serialize = "love-timer-last-visit")]
  LastVisit,
  /// `BTreeMap<String, CommentPair>`, local copy of the shared comments.
  #[strum(serialize = "love-timer-anime-comments")]
  AnimeComments,
  /// `Vec<CalendarEvent>`.
  #[strum(serialize = "love-timer-calendar-events")]
  CalendarEvents,
  /// `Vec<String>` of question ids.
  #[strum(serialize = "love-timer-quiz-answered")]
  QuizAnswered,
  /// `Vec<String>` of food ids.
  #[strum(serialize = "love-timer-gacha-collected")]
  GachaCollected,
  /// `Vec<String>` of dish ids.
  #[strum(serialize = "love-timer-cooking-completed")]
  CookingCompleted,
}

impl StorageKey {
  pub fn as_str(self) -> &'static str { self.into() }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn key_strings_are_unique_and_prefixed() {
    let names: HashSet<&str> = StorageKey::iter().map(StorageKey::as_str).collect();
    assert_eq!(names.len(), StorageKey::iter().count());
    assert!(names.iter().all(|n| n.starts_with("love-timer-")));
  }

  #[test]
  fn as_ref_matches_as_str() {
    assert_eq!(StorageKey::TodoStates.as_ref(), "love-timer-todo-states");
    assert_eq!(StorageKey::GachaCollected.as_str(), "love-timer-gacha-collected");
  }
}
