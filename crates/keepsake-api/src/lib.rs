//! JSON REST API for Keepsake.
//!
//! Exposes the `anime_comments` table as an axum [`Router`] backed by any
//! [`CommentTable`]. TLS and authentication are the caller's concern.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/rest/v1", keepsake_api::api_router(table.clone()))
//! ```

pub mod comments;
pub mod error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use keepsake_core::comment::CommentTable;
use serde::Deserialize;

pub use error::ApiError;

/// Prefix the server mounts [`api_router`] under.
pub const REST_PREFIX: &str = "/rest/v1";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `KEEPSAKE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8787 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/keepsake/comments.db") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the comments router for `table`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(table: Arc<S>) -> Router<()>
where
  S: CommentTable + 'static,
{
  Router::new()
    .route(
      "/anime_comments",
      get(comments::select::<S>)
        .post(comments::insert::<S>)
        .patch(comments::update::<S>),
    )
    .fallback(comments::not_found)
    .with_state(table)
}
