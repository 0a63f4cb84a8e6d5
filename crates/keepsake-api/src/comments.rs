//! Handlers for `/anime_comments`.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/anime_comments` | optional `anime_id`, `person`, `limit`; ascending by `created_at` |
//! | `POST`  | `/anime_comments` | Body: [`NewComment`]; returns 201 + stored row |
//! | `PATCH` | `/anime_comments?anime_id=&person=` | Body: [`PatchBody`]; returns every updated row |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use keepsake_core::comment::{AnimeId, CommentFilter, CommentRow, CommentTable, NewComment, Person};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ApiJson, ApiQuery};

fn known_anime(anime_id: &str) -> Result<(), ApiError> {
  anime_id
    .parse::<AnimeId>()
    .map(drop)
    .map_err(|_| ApiError::BadRequest(format!("unknown anime id {anime_id:?}")))
}

// ─── Select ──────────────────────────────────────────────────────────────────

/// `GET /anime_comments[?anime_id=...][&person=...][&limit=...]`
///
/// Unknown anime ids are not rejected here; they simply match nothing.
pub async fn select<S>(
  State(table): State<Arc<S>>,
  ApiQuery(filter): ApiQuery<CommentFilter>,
) -> Result<Json<Vec<CommentRow>>, ApiError>
where
  S: CommentTable,
{
  let rows = table.select(&filter).await.map_err(ApiError::store)?;
  debug!(count = rows.len(), "selected comment rows");
  Ok(Json(rows))
}

// ─── Insert ──────────────────────────────────────────────────────────────────

/// `POST /anime_comments`, returns 201 + the stored [`CommentRow`].
pub async fn insert<S>(
  State(table): State<Arc<S>>,
  ApiJson(body): ApiJson<NewComment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CommentTable,
{
  known_anime(&body.anime_id)?;
  if body.comment.trim().is_empty() {
    return Err(ApiError::BadRequest("comment must not be empty".into()));
  }
  let row = table.insert(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(row)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PairParams {
  pub anime_id: String,
  pub person:   Person,
}

#[derive(Debug, Deserialize)]
pub struct PatchBody {
  pub comment: String,
}

/// `PATCH /anime_comments?anime_id=<id>&person=<person>` — body `{"comment":"..."}`.
///
/// An empty array means no row matched.
pub async fn update<S>(
  State(table): State<Arc<S>>,
  ApiQuery(pair): ApiQuery<PairParams>,
  ApiJson(body): ApiJson<PatchBody>,
) -> Result<Json<Vec<CommentRow>>, ApiError>
where
  S: CommentTable,
{
  known_anime(&pair.anime_id)?;
  if body.comment.trim().is_empty() {
    return Err(ApiError::BadRequest("comment must not be empty".into()));
  }
  let rows = table
    .update(&pair.anime_id, pair.person, body.comment)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError { ApiError::NotFound("no such route".into()) }
