//! Core types and trait definitions for Keepsake.
//!
//! Two persistence patterns live here. [`local::LocalStore`] is the typed,
//! never-failing view over a [`storage::DurableStorage`] backend that every
//! page reads and writes. [`book::CommentBook`] mirrors the shared anime
//! comments to any [`comment::CommentTable`].
//!
//! This crate is free of HTTP and database dependencies. Backends live in
//! `keepsake-store-sqlite`; the remote table client lives in `keepsake-cli`.

// Trait futures spell out their `Send` bounds; impls use plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod book;
pub mod calendar;
pub mod candle;
pub mod collection;
pub mod comment;
pub mod elapsed;
pub mod error;
pub mod gacha;
pub mod key;
pub mod local;
pub mod quiz;
pub mod session;
pub mod storage;
pub mod todo;
pub mod visits;

pub use error::{Error, Result};
pub use key::StorageKey;
pub use local::{LocalStore, Persist};
pub use storage::{DurableStorage, MemoryStorage};
