//! SQLite backends for Keepsake.
//!
//! [`SqliteStorage`] is a durable key-value file implementing
//! [`keepsake_core::DurableStorage`]; it is what a desktop or CLI build uses
//! in place of browser local storage. [`SqliteCommentTable`] is the
//! server-side `anime_comments` table, wrapped in [`tokio_rusqlite`] so all
//! access runs off the async runtime.

mod comments;
mod encode;
mod kv;
mod schema;

pub mod error;

pub use comments::SqliteCommentTable;
pub use error::{Error, Result};
pub use kv::SqliteStorage;

#[cfg(test)]
mod tests;
