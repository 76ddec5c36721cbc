//! Tubely Database Library
//!
//! Access to the `videos` metadata table, behind the `VideoStore` trait so the
//! upload path can run against Postgres or an in-memory store.

pub mod db;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use db::{VideoRepository, VideoStore};
