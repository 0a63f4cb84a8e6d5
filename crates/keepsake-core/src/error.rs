//! Error types for `keepsake-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown anime id: {0:?}")]
  UnknownAnime(String),

  #[error("unknown author: {0:?}")]
  UnknownPerson(String),

  #[error("unknown quiz category: {0:?}")]
  UnknownCategory(String),

  #[error("unknown language: {0:?}")]
  UnknownLanguage(String),

  #[error("quiz document is invalid: {0}")]
  QuizDocument(#[source] serde_json::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
