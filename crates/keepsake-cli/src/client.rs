//! Async HTTP client for the keepsake REST API.
//!
//! [`ApiClient`] implements [`CommentTable`], so a [`CommentBook`] can run
//! against a remote server exactly as it does against an in-process table.
//!
//! [`CommentBook`]: keepsake_core::book::CommentBook

use std::time::Duration;

use keepsake_core::comment::{CommentFilter, CommentRow, CommentTable, NewComment, Person};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{method} {path} → {status}: {body}")]
  Status {
    method: &'static str,
    path:   &'static str,
    status: StatusCode,
    body:   String,
  },
}

/// Connection settings for the keepsake API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Server origin, e.g. `http://localhost:8787`.
  pub base_url: String,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

const TABLE_PATH: &str = "/anime_comments";

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/rest/v1{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn check(method: &'static str, resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status { method, path: TABLE_PATH, status, body })
  }
}

#[derive(Serialize)]
struct PairQuery<'a> {
  anime_id: &'a str,
  person:   Person,
}

#[derive(Serialize)]
struct PatchBody {
  comment: String,
}

impl CommentTable for ApiClient {
  type Error = ClientError;

  /// `GET /rest/v1/anime_comments[?anime_id=...][&person=...][&limit=...]`
  async fn select(&self, filter: &CommentFilter) -> Result<Vec<CommentRow>, ClientError> {
    let resp = self.client.get(self.url(TABLE_PATH)).query(filter).send().await?;
    Ok(Self::check("GET", resp).await?.json().await?)
  }

  /// `POST /rest/v1/anime_comments`
  async fn insert(&self, input: NewComment) -> Result<CommentRow, ClientError> {
    let resp = self.client.post(self.url(TABLE_PATH)).json(&input).send().await?;
    Ok(Self::check("POST", resp).await?.json().await?)
  }

  /// `PATCH /rest/v1/anime_comments?anime_id=<id>&person=<person>`
  async fn update(
    &self,
    anime_id: &str,
    person: Person,
    comment: String,
  ) -> Result<Vec<CommentRow>, ClientError> {
    let resp = self
      .client
      .patch(self.url(TABLE_PATH))
      .query(&PairQuery { anime_id, person })
      .json(&PatchBody { comment })
      .send()
      .await?;
    Ok(Self::check("PATCH", resp).await?.json().await?)
  }
}
