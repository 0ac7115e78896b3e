//! Handlers for registration and login.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: `{"name","email","password"}`; 201 + `{"token"}` |
//! | `GET`  | `/auth` | Private; the caller's account without password hash |
//! | `POST` | `/auth` | Body: `{"email","password"}`; `{"token"}` |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use devconnector_core::{
  Error,
  error::Resource,
  identity::{Login, NewUser, PublicUser, User},
  store::DocumentStore,
};
use serde::Serialize;

use crate::{
  AppState,
  auth::{AuthUser, hash_password, verify_password},
  error::ApiError,
  payload::ValidJson,
};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub token: String,
}

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /users`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  ValidJson(input): ValidJson<NewUser>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let existing = state
    .store
    .find_user_by_email(&input.email)
    .await
    .map_err(ApiError::store)?;
  if existing.is_some() {
    return Err(Error::UserExists.into());
  }

  let user = User::new(input.name, input.email, hash_password(&input.password)?);
  // A concurrent registration can still win between the check and here.
  let inserted = state.store.insert_user(&user).await.map_err(ApiError::store)?;
  if !inserted {
    return Err(Error::UserExists.into());
  }
  tracing::info!(user_id = %user.user_id, "registered user");

  let token = state.tokens.issue(user.user_id)?;
  Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

// ─── Current user ─────────────────────────────────────────────────────────────

/// `GET /auth`
pub async fn current_user<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
) -> Result<Json<PublicUser>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = state
    .store
    .get_user(identity.user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::NotFound(Resource::User))?;
  Ok(Json(user.public()))
}

// ─── Login ────────────────────────────────────────────────────────────────────

/// `POST /auth`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  ValidJson(input): ValidJson<Login>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = state
    .store
    .find_user_by_email(&input.email)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::InvalidCredentials)?;

  if !verify_password(&input.password, &user.password_hash) {
    tracing::debug!(user_id = %user.user_id, "wrong password");
    return Err(Error::InvalidCredentials.into());
  }

  let token = state.tokens.issue(user.user_id)?;
  Ok(Json(TokenResponse { token }))
}
