//! Handlers for `/profile` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/profile` | Public; all profiles |
//! | `POST`   | `/profile` | Private; create or update own profile |
//! | `DELETE` | `/profile` | Private; delete own posts, profile and account |
//! | `GET`    | `/profile/me` | Private; 404 if none |
//! | `GET`    | `/profile/user/:user_id` | Public; 404 if none |
//! | `PUT`    | `/profile/experience` | Private; prepend an experience entry |
//! | `DELETE` | `/profile/experience/:exp_id` | Private; unknown id is a no-op |
//! | `PUT`    | `/profile/education` | Private; prepend an education entry |
//! | `DELETE` | `/profile/education/:edu_id` | Private; unknown id is a no-op |

use axum::{
  Json,
  extract::{Path, State},
};
use devconnector_core::{
  Error, Identity,
  error::Resource,
  profile::{Education, Experience, NewEducation, NewExperience, Profile, ProfileFields},
  store::DocumentStore,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError, payload::ValidJson};

/// Load the caller's own profile or fail with 404.
async fn own_profile<S>(state: &AppState<S>, identity: &Identity) -> Result<Profile, ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profile = state
    .store
    .find_profile_by_user(identity.user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::NotFound(Resource::Profile))?;
  Ok(profile)
}

async fn save<S>(state: &AppState<S>, profile: &Profile) -> Result<(), ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state.store.save_profile(profile).await.map_err(ApiError::store)
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /profile`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profiles = state.store.list_profiles().await.map_err(ApiError::store)?;
  Ok(Json(profiles))
}

/// `GET /profile/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
) -> Result<Json<Profile>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(own_profile(&state, &identity).await?))
}

/// `GET /profile/user/:user_id`
pub async fn by_user<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user_id = Uuid::parse_str(&user_id).map_err(|_| Error::NotFound(Resource::Profile))?;
  let profile = state
    .store
    .find_profile_by_user(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::NotFound(Resource::Profile))?;
  Ok(Json(profile))
}

// ─── Create / update ──────────────────────────────────────────────────────────

/// `POST /profile` — body: [`ProfileFields`].
pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  ValidJson(fields): ValidJson<ProfileFields>,
) -> Result<Json<Profile>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let existing = state
    .store
    .find_profile_by_user(identity.user_id)
    .await
    .map_err(ApiError::store)?;

  let profile = match existing {
    Some(mut profile) => {
      profile.apply(fields);
      profile
    }
    None => Profile::new(identity.user_id, fields),
  };

  save(&state, &profile).await?;
  tracing::debug!(profile_id = %profile.profile_id, "profile saved");
  Ok(Json(profile))
}

// ─── Delete account ───────────────────────────────────────────────────────────

/// `DELETE /profile` — removes the caller's posts, profile and account.
pub async fn delete_account<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
) -> Result<Json<Value>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let posts = state
    .store
    .delete_posts_by_user(identity.user_id)
    .await
    .map_err(ApiError::store)?;
  state
    .store
    .delete_profile_by_user(identity.user_id)
    .await
    .map_err(ApiError::store)?;
  state
    .store
    .delete_user(identity.user_id)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = %identity.user_id, posts, "deleted account");
  Ok(Json(json!({ "msg": "user deleted" })))
}

// ─── Experience ───────────────────────────────────────────────────────────────

/// `PUT /profile/experience` — body: [`NewExperience`].
pub async fn add_experience<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  ValidJson(input): ValidJson<NewExperience>,
) -> Result<Json<Profile>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = Experience::try_from(input)?;
  let mut profile = own_profile(&state, &identity).await?;
  let id = profile.add_experience(entry).experience_id;
  save(&state, &profile).await?;
  tracing::debug!(experience_id = %id, "experience added");
  Ok(Json(profile))
}

/// `DELETE /profile/experience/:exp_id`
///
/// An id that matches nothing (or is not a UUID at all) leaves the list as
/// is; the profile is still saved and returned.
pub async fn remove_experience<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  Path(exp_id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut profile = own_profile(&state, &identity).await?;
  if let Ok(id) = Uuid::parse_str(&exp_id) {
    profile.remove_experience(id);
  }
  save(&state, &profile).await?;
  Ok(Json(profile))
}

// ─── Education ────────────────────────────────────────────────────────────────

/// `PUT /profile/education` — body: [`NewEducation`].
pub async fn add_education<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  ValidJson(input): ValidJson<NewEducation>,
) -> Result<Json<Profile>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = Education::try_from(input)?;
  let mut profile = own_profile(&state, &identity).await?;
  let id = profile.add_education(entry).education_id;
  save(&state, &profile).await?;
  tracing::debug!(education_id = %id, "education added");
  Ok(Json(profile))
}

/// `DELETE /profile/education/:edu_id` — same lenient policy as experience.
pub async fn remove_education<S>(
  State(state): State<AppState<S>>,
  AuthUser(identity): AuthUser,
  Path(edu_id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut profile = own_profile(&state, &identity).await?;
  if let Ok(id) = Uuid::parse_str(&edu_id) {
    profile.remove_education(id);
  }
  save(&state, &profile).await?;
  Ok(Json(profile))
}
