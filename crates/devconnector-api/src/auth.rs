//! Bearer-token extractor and argon2 password helpers.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use devconnector_core::{Error, Identity, store::DocumentStore, token::TokenService};
use rand_core::OsRng;

use crate::{AppState, error::ApiError};

/// Header carrying the token, as sent by the web client.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// The verified identity of the caller. Present in a handler means the
/// request carried a valid token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

/// Pull the raw credential from `x-auth-token`, falling back to
/// `Authorization: Bearer`. A header that is present but unreadable is an
/// invalid token, not a missing one.
pub fn credential(headers: &HeaderMap) -> Result<Option<&str>, Error> {
  if let Some(v) = headers.get(TOKEN_HEADER) {
    return v.to_str().map(Some).map_err(|_| Error::InvalidToken);
  }
  match headers.get(header::AUTHORIZATION) {
    None => Ok(None),
    Some(v) => {
      let v = v.to_str().map_err(|_| Error::InvalidToken)?;
      v.strip_prefix("Bearer ").map(Some).ok_or(Error::InvalidToken)
    }
  }
}

/// Verify the request's token directly from headers.
pub fn verify_headers(headers: &HeaderMap, tokens: &TokenService) -> Result<Identity, Error> {
  tokens.verify(credential(headers)?)
}

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    match verify_headers(&parts.headers, &state.tokens) {
      Ok(identity) => Ok(AuthUser(identity)),
      Err(e) => {
        if matches!(e, Error::InvalidToken) {
          tracing::warn!(path = %parts.uri.path(), "rejected invalid token");
        }
        Err(e.into())
      }
    }
  }
}

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::PasswordHash(e.to_string()))
}

/// Check `password` against a stored PHC string. A malformed stored hash
/// never matches.
pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .map(|parsed| {
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    })
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;
  use chrono::Duration;
  use uuid::Uuid;

  fn tokens() -> TokenService { TokenService::new("secret", Duration::hours(1)) }

  fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
    let mut h = HeaderMap::new();
    for (k, v) in pairs {
      h.insert(*k, HeaderValue::from_str(v).unwrap());
    }
    h
  }

  #[test]
  fn reads_x_auth_token() {
    let t = tokens();
    let id = Uuid::new_v4();
    let token = t.issue(id).unwrap();
    let identity = verify_headers(&headers(&[("x-auth-token", &token)]), &t).unwrap();
    assert_eq!(identity.user_id, id);
  }

  #[test]
  fn falls_back_to_bearer() {
    let t = tokens();
    let id = Uuid::new_v4();
    let bearer = format!("Bearer {}", t.issue(id).unwrap());
    let identity = verify_headers(&headers(&[("authorization", &bearer)]), &t).unwrap();
    assert_eq!(identity.user_id, id);
  }

  #[test]
  fn no_header_is_missing_token() {
    assert!(matches!(
      verify_headers(&HeaderMap::new(), &tokens()),
      Err(Error::MissingToken)
    ));
  }

  #[test]
  fn basic_scheme_is_invalid() {
    let h = headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
    assert!(matches!(verify_headers(&h, &tokens()), Err(Error::InvalidToken)));
  }

  #[test]
  fn password_round_trip() {
    let phc = hash_password("hunter22").unwrap();
    assert!(verify_password("hunter22", &phc));
    assert!(!verify_password("hunter23", &phc));
    assert!(!verify_password("hunter22", "not-a-phc-string"));
  }
}
