//! Handlers for `/posts` endpoints. Every route is private.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Newest first |
//! | `POST`   | `/posts` | Body: `{"text":"..."}` |
//! | `GET`    | `/posts/:id` | 404 if not found |
//! | `DELETE` | `/posts/:id` | Owner only |
//! | `PUT`    | `/posts/like/:id` | 409 if already liked; returns likes |
//! | `PUT`    | `/posts/unlike/:id` | 409 if not liked; returns likes |
//! | `POST`   | `/posts/comment/:id` | Body: `{"text":"..."}`; returns the post |
//! | `DELETE` | `/posts/comment/:id/:comment_id` | Author only; returns the post |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use devconnector_core::{
  Error, Identity,
  error::Resource,
  identity::User,
  ownership::ensure_owner,
  post::{Like, NewText, Post},
  store::DocumentStore,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError, payload::ValidJson};

/// Parse a path id; anything that is not a UUID cannot name a stored
/// document, so it is reported as not found.
fn parse_id(raw: &str, resource: Resource) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| Error::NotFound(resource).into())
}

async fn load_post<S>(state: &AppState<S>, raw_id: &str) -> Result<Post, ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post_id = parse_id(raw_id, Resource::Post)?;
  let post = state
    .store
    .get_post(post_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::NotFound(Resource::Post))?;
  Ok(post)
}

async fn load_author<S>(state: &AppState<S>, identity: &Identity) -> Result<User, ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = state
    .store
    .get_user(identity.user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::NotFound(Resource::User))?;
  Ok(user)
}

async fn save<S>(state: &AppState<S>, post: &Post) -> Result<(), ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state.store.save_post(post).await.map_err(ApiError::store)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /posts` — returns 201 + the stored [`Post`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  ValidJson(input): ValidJson<NewText>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let author = load_author(&state, &identity).await?;
  let post = Post::new(&author, input);
  save(&state, &post).await?;
  tracing::debug!(post_id = %post.post_id, "post created");
  Ok((StatusCode::CREATED, Json(post)))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  AuthUser(_): AuthUser,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let posts = state.store.list_posts().await.map_err(ApiError::store)?;
  Ok(Json(posts))
}

/// `GET /posts/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  AuthUser(_): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<Post>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(load_post(&state, &id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /posts/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post = load_post(&state, &id).await?;
  ensure_owner(&identity, post.user, Resource::Post)?;
  state
    .store
    .delete_post(post.post_id)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(post_id = %post.post_id, "post removed");
  Ok(Json(json!({ "msg": "post removed" })))
}

// ─── Likes ────────────────────────────────────────────────────────────────────

/// `PUT /posts/like/:id`
pub async fn like<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut post = load_post(&state, &id).await?;
  post.like(&identity)?;
  save(&state, &post).await?;
  Ok(Json(post.likes))
}

/// `PUT /posts/unlike/:id`
pub async fn unlike<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut post = load_post(&state, &id).await?;
  post.unlike(&identity)?;
  save(&state, &post).await?;
  Ok(Json(post.likes))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `POST /posts/comment/:id`
pub async fn comment<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  Path(id): Path<String>,
  ValidJson(input): ValidJson<NewText>,
) -> Result<Json<Post>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let author = load_author(&state, &identity).await?;
  let mut post = load_post(&state, &id).await?;
  let comment_id = post.add_comment(&author, input).comment_id;
  save(&state, &post).await?;
  tracing::debug!(post_id = %post.post_id, %comment_id, "comment added");
  Ok(Json(post))
}

/// `DELETE /posts/comment/:id/:comment_id`
pub async fn delete_comment<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Post>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut post = load_post(&state, &id).await?;
  let comment_id = parse_id(&comment_id, Resource::Comment)?;
  post.remove_comment(&identity, comment_id)?;
  save(&state, &post).await?;
  Ok(Json(post))
}
