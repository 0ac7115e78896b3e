//! Core types and rules for the DevConnector backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the document types, the token gate, the ownership check, and the in-memory
//! mutations (likes, ordered sub-collections) that handlers run before saving.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod collection;
pub mod error;
pub mod identity;
pub mod ownership;
pub mod post;
pub mod profile;
pub mod store;
pub mod token;
pub mod validate;

pub use error::{Error, ErrorKind, Result};
pub use identity::Identity;
