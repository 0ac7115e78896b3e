//! SQLite backend for the DevConnector document store.
//!
//! Each post and profile is kept as one JSON document per row, next to the
//! few columns used for lookups. Wraps [`tokio_rusqlite`] so all database
//! access runs on a dedicated thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
