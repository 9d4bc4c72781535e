//! In-memory storage for quill records.
//!
//! A [`Table`] hands out ids and timestamps, answers exact-match lookups and
//! enforces unique fields under its own write lock. Validators in the
//! application crate may check uniqueness ahead of time for friendlier
//! errors, but only the table's check is atomic with the write.

mod error;
mod table;

pub use error::DbError;
pub use table::{Record, Row, Table};
