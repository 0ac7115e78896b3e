//! JSON REST API for DevConnector.
//!
//! Exposes an axum [`Router`] backed by any
//! [`devconnector_core::store::DocumentStore`]. Private routes require a token
//! in the `x-auth-token` header (or `Authorization: Bearer …`).
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = devconnector_api::router(state);
//! ```

pub mod accounts;
pub mod auth;
pub mod error;
pub mod payload;
pub mod posts;
pub mod profile;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use devconnector_core::{store::DocumentStore, token::DEFAULT_TTL_SECS, token::TokenService};
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `DEVCONNECTOR_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// HMAC secret used to sign and verify tokens.
  pub jwt_secret:     String,
  #[serde(default = "default_token_ttl")]
  pub token_ttl_secs: i64,
}

fn default_token_ttl() -> i64 { DEFAULT_TTL_SECS }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: DocumentStore> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenService>,
}

impl<S: DocumentStore> AppState<S> {
  pub fn new(store: S, config: &ServerConfig) -> Self {
    Self {
      store:  Arc::new(store),
      tokens: Arc::new(TokenService::new(
        &config.jwt_secret,
        chrono::Duration::seconds(config.token_ttl_secs),
      )),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API routes without a prefix.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Accounts
    .route("/users", post(accounts::register::<S>))
    .route("/auth", get(accounts::current_user::<S>).post(accounts::login::<S>))
    // Profiles
    .route(
      "/profile",
      get(profile::list::<S>)
        .post(profile::upsert::<S>)
        .delete(profile::delete_account::<S>),
    )
    .route("/profile/me", get(profile::me::<S>))
    .route("/profile/user/{user_id}", get(profile::by_user::<S>))
    .route("/profile/experience", put(profile::add_experience::<S>))
    .route("/profile/experience/{exp_id}", delete(profile::remove_experience::<S>))
    .route("/profile/education", put(profile::add_education::<S>))
    .route("/profile/education/{edu_id}", delete(profile::remove_education::<S>))
    // Posts
    .route("/posts", get(posts::list::<S>).post(posts::create::<S>))
    .route("/posts/{id}", get(posts::get_one::<S>).delete(posts::delete_one::<S>))
    .route("/posts/like/{id}", put(posts::like::<S>))
    .route("/posts/unlike/{id}", put(posts::unlike::<S>))
    .route("/posts/comment/{id}", post(posts::comment::<S>))
    .route("/posts/comment/{id}/{comment_id}", delete(posts::delete_comment::<S>))
    .with_state(state)
}

/// The full application: every API route under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new().nest("/api", api_router(state))
}
