//! The card quiz.
//!
//! Questions come from an external JSON document with two categories. Each
//! question may carry per-language overrides; missing text falls back to the
//! base fields and then to a placeholder. Answered question ids are kept in
//! an [`UnlockSet`].

use std::collections::BTreeMap;

use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{
  Error,
  Result,
  collection::UnlockSet,
  key::StorageKey,
  local::LocalStore,
  session::Language,
  storage::DurableStorage,
};

pub const MISSING_QUESTION: &str = "问题加载失败";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
  Daily,
  R18,
}

// ─── Document shape ──────────────────────────────────────────────────────────

/// Question ids may be written as strings or numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
  Text(String),
  Number(i64),
}

impl RawId {
  fn into_string(self) -> String {
    match self {
      Self::Text(s) => s,
      Self::Number(n) => n.to_string(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Translation {
  question: Option<String>,
  options:  Option<BTreeMap<String, String>>,
  results:  Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawQuestion {
  id:       RawId,
  question: Option<String>,
  options:  Option<BTreeMap<String, String>>,
  results:  Option<BTreeMap<String, String>>,
  zh:       Option<Translation>,
  ja:       Option<Translation>,
  en:       Option<Translation>,
}

impl RawQuestion {
  fn localize(self, language: Language) -> Question {
    let translation = match language {
      Language::Zh => self.zh,
      Language::Ja => self.ja,
      Language::En => self.en,
    }
    .unwrap_or_default();

    Question {
      id:       self.id.into_string(),
      question: translation
        .question
        .or(self.question)
        .unwrap_or_else(|| MISSING_QUESTION.to_owned()),
      options:  translation.options.or(self.options).unwrap_or_default(),
      results:  translation.results.or(self.results).unwrap_or_default(),
    }
  }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
  #[serde(default)]
  daily: Vec<RawQuestion>,
  #[serde(default)]
  r18:   Vec<RawQuestion>,
}

// ─── Bank ────────────────────────────────────────────────────────────────────

/// A question with text resolved for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
  pub id:       String,
  pub question: String,
  /// Option key → option text.
  pub options:  BTreeMap<String, String>,
  /// Option key → result text shown after answering.
  pub results:  BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct QuizBank {
  daily: Vec<Question>,
  r18:   Vec<Question>,
}

impl QuizBank {
  /// Parse the question document and resolve text for `language`.
  pub fn from_json(json: &str, language: Language) -> Result<Self> {
    let doc: RawDocument = serde_json::from_str(json).map_err(Error::QuizDocument)?;
    Ok(Self {
      daily: doc.daily.into_iter().map(|q| q.localize(language)).collect(),
      r18:   doc.r18.into_iter().map(|q| q.localize(language)).collect(),
    })
  }

  pub fn questions(&self, category: Category) -> &[Question] {
    match category {
      Category::Daily => &self.daily,
      Category::R18 => &self.r18,
    }
  }

  pub fn find(&self, id: &str) -> Option<&Question> {
    self.daily.iter().chain(self.r18.iter()).find(|q| q.id == id)
  }
}

// ─── Quiz ────────────────────────────────────────────────────────────────────

pub struct Quiz<B> {
  bank:     QuizBank,
  answered: UnlockSet<B>,
}

impl<B: DurableStorage> Quiz<B> {
  pub fn open(store: LocalStore<B>, bank: QuizBank) -> Self {
    Self { bank, answered: UnlockSet::open(store, StorageKey::QuizAnswered) }
  }

  pub fn bank(&self) -> &QuizBank { &self.bank }

  /// Unanswered questions of `category`, in document order.
  pub fn remaining(&self, category: Category) -> Vec<&Question> {
    self
      .bank
      .questions(category)
      .iter()
      .filter(|q| !self.answered.contains(&q.id))
      .collect()
  }

  /// Pick a random unanswered question, or `None` when the category is done.
  pub fn draw(&self, category: Category, rng: &mut impl RngCore) -> Option<&Question> {
    let remaining = self.remaining(category);
    if remaining.is_empty() {
      return None;
    }
    let index = (rng.next_u64() % remaining.len() as u64) as usize;
    remaining.get(index).copied()
  }

  /// Mark `id` answered. Returns `true` if it had not been answered before.
  pub fn answer(&mut self, id: &str) -> bool { self.answered.insert(id) }

  pub fn answered(&self) -> &[String] { self.answered.ids() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStorage;

  const DOC: &str = r#"{
    "daily": [
      {
        "id": "d1",
        "question": "Base question",
        "options": { "a": "Yes", "b": "No" },
        "results": { "a": "Good", "b": "Hmm" },
        "en": { "question": "English question" }
      },
      { "id": 2, "zh": { "question": "中文", "options": { "a": "是" } } },
      { "id": "d3" }
    ],
    "r18": [ { "id": "r1", "question": "Secret" } ]
  }"#;

  struct Fixed(u64);

  impl RngCore for Fixed {
    fn next_u32(&mut self) -> u32 { self.0 as u32 }

    fn next_u64(&mut self) -> u64 { self.0 }

    fn fill_bytes(&mut self, dest: &mut [u8]) { dest.fill(0) }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  #[test]
  fn translations_fall_back_to_base_then_placeholder() {
    let bank = QuizBank::from_json(DOC, Language::En).unwrap();
    let daily = bank.questions(Category::Daily);
    assert_eq!(daily[0].question, "English question");
    // Options come from the base since the override has none.
    assert_eq!(daily[0].options["a"], "Yes");
    assert_eq!(daily[1].id, "2");
    assert_eq!(daily[1].question, MISSING_QUESTION);
    assert!(daily[2].options.is_empty());

    let zh = QuizBank::from_json(DOC, Language::Zh).unwrap();
    assert_eq!(zh.questions(Category::Daily)[1].question, "中文");
    assert_eq!(zh.questions(Category::Daily)[0].question, "Base question");
  }

  #[test]
  fn invalid_document_is_an_error() {
    assert!(matches!(
      QuizBank::from_json("not json", Language::Zh),
      Err(Error::QuizDocument(_))
    ));
    // Missing categories are simply empty.
    let bank = QuizBank::from_json("{}", Language::Zh).unwrap();
    assert!(bank.questions(Category::R18).is_empty());
  }

  #[test]
  fn draw_skips_answered_questions() {
    let store = LocalStore::new(MemoryStorage::new());
    let bank = QuizBank::from_json(DOC, Language::En).unwrap();
    let mut quiz = Quiz::open(store.clone(), bank);

    assert_eq!(quiz.draw(Category::Daily, &mut Fixed(0)).unwrap().id, "d1");
    assert!(quiz.answer("d1"));
    assert!(!quiz.answer("d1"));
    assert_eq!(quiz.draw(Category::Daily, &mut Fixed(0)).unwrap().id, "2");
    assert_eq!(quiz.remaining(Category::Daily).len(), 2);

    quiz.answer("r1");
    assert!(quiz.draw(Category::R18, &mut Fixed(7)).is_none());

    let stored: Vec<String> = store.read(StorageKey::QuizAnswered, vec![]);
    assert_eq!(stored, ["d1", "r1"]);
  }

  #[test]
  fn answered_set_survives_reopen() {
    let store = LocalStore::new(MemoryStorage::new());
    let bank = QuizBank::from_json(DOC, Language::Ja).unwrap();
    let mut quiz = Quiz::open(store.clone(), bank.clone());
    quiz.answer("d3");

    let reopened = Quiz::open(store, bank);
    assert_eq!(reopened.answered(), ["d3"]);
    assert!(reopened.bank().find("d3").is_some());
  }

  #[test]
  fn category_parses() {
    assert_eq!("r18".parse::<Category>().unwrap(), Category::R18);
    assert_eq!(Category::Daily.to_string(), "daily");
  }
}
