//! The `DocumentStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `devconnector-store-sqlite`). Handlers fetch a whole document, mutate it in
//! memory with the methods in [`crate::post`] and [`crate::profile`], then
//! save it back. Saving replaces the stored document wholesale.

use std::future::Future;

use uuid::Uuid;

use crate::{identity::User, post::Post, profile::Profile};

/// Abstraction over the document database.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Returns `false`, storing nothing, when the email
  /// is already registered.
  fn insert_user<'a>(
    &'a self,
    user: &'a User,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look a user up by (normalised) email.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Delete a user. Returns whether a row was removed.
  fn delete_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Insert or replace a post.
  fn save_post<'a>(
    &'a self,
    post: &'a Post,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_post(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// All posts, newest first.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  fn delete_post(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete every post owned by `user_id`; returns how many were removed.
  fn delete_posts_by_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Insert or replace a profile. There is at most one profile per user.
  fn save_profile<'a>(
    &'a self,
    profile: &'a Profile,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// The profile owned by `user_id`, if one exists.
  fn find_profile_by_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  fn delete_profile_by_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
