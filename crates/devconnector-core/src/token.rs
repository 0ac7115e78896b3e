//! Bearer token issuance and verification (HS256 JWT).
//!
//! The secret and lifetime are passed in explicitly; nothing is read from the
//! environment here.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, error::Error, identity::Identity};

/// Tokens live for 100 hours unless configured otherwise.
pub const DEFAULT_TTL_SECS: i64 = 360_000;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// The user id, hyphenated.
  pub sub: String,
  pub iat: i64,
  pub exp: i64,
}

/// Holds the HMAC keys derived from the server secret.
pub struct TokenService {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl:        Duration,
}

impl TokenService {
  pub fn new(secret: &str, ttl: Duration) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      validation,
      ttl,
    }
  }

  /// Mint a token for `user_id`.
  pub fn issue(&self, user_id: Uuid) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
      sub: user_id.hyphenated().to_string(),
      iat: now.timestamp(),
      exp: (now + self.ttl).timestamp(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(Error::TokenEncoding)
  }

  /// Verify a credential taken from a request header.
  ///
  /// `None` and blank strings are [`Error::MissingToken`]; anything that does
  /// not decode, fails the signature, is expired, or carries a non-UUID
  /// subject is [`Error::InvalidToken`].
  pub fn verify(&self, credential: Option<&str>) -> Result<Identity> {
    let token = credential
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .ok_or(Error::MissingToken)?;

    let data = decode::<Claims>(token, &self.decoding, &self.validation)
      .map_err(|_| Error::InvalidToken)?;
    let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| Error::InvalidToken)?;

    Ok(Identity::new(user_id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ErrorKind;
  use base64::Engine as _;
  use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;

  fn service() -> TokenService { TokenService::new("test-secret", Duration::hours(1)) }

  #[test]
  fn issued_token_verifies_to_same_user() {
    let svc = service();
    let id = Uuid::new_v4();
    let token = svc.issue(id).unwrap();
    assert_eq!(svc.verify(Some(&token)).unwrap(), Identity::new(id));
  }

  #[test]
  fn missing_token() {
    let svc = service();
    for cred in [None, Some(""), Some("   ")] {
      let err = svc.verify(cred).unwrap_err();
      assert!(matches!(err, Error::MissingToken), "{cred:?}");
      assert_eq!(err.kind(), ErrorKind::Unauthorized);
      assert_eq!(err.to_string(), "no token, authorization denied");
    }
  }

  #[test]
  fn garbage_token_is_invalid() {
    let err = service().verify(Some("not.a.jwt")).unwrap_err();
    assert!(matches!(err, Error::InvalidToken));
    assert_eq!(err.to_string(), "token is not valid");
  }

  #[test]
  fn altered_signature_is_invalid() {
    let svc = service();
    let token = svc.issue(Uuid::new_v4()).unwrap();
    let (head, sig) = token.rsplit_once('.').unwrap();
    let mut sig: Vec<char> = sig.chars().collect();
    let mid = sig.len() / 2;
    sig[mid] = if sig[mid] == 'A' { 'B' } else { 'A' };
    let tampered = format!("{head}.{}", sig.into_iter().collect::<String>());

    assert!(matches!(svc.verify(Some(&tampered)), Err(Error::InvalidToken)));
  }

  #[test]
  fn forged_subject_is_invalid() {
    let svc = service();
    let token = svc.issue(Uuid::new_v4()).unwrap();
    let parts: Vec<&str> = token.split('.').collect();

    let mut claims: serde_json::Value =
      serde_json::from_slice(&B64.decode(parts[1]).unwrap()).unwrap();
    claims["sub"] = serde_json::json!(Uuid::new_v4().to_string());
    let forged_payload = B64.encode(serde_json::to_vec(&claims).unwrap());
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert!(matches!(svc.verify(Some(&forged)), Err(Error::InvalidToken)));
  }

  #[test]
  fn other_secret_is_invalid() {
    let token = TokenService::new("other", Duration::hours(1))
      .issue(Uuid::new_v4())
      .unwrap();
    assert!(matches!(service().verify(Some(&token)), Err(Error::InvalidToken)));
  }

  #[test]
  fn expired_token_is_invalid() {
    // Well past the default 60s leeway.
    let svc = TokenService::new("test-secret", Duration::minutes(-10));
    let token = svc.issue(Uuid::new_v4()).unwrap();
    assert!(matches!(svc.verify(Some(&token)), Err(Error::InvalidToken)));
  }

  #[test]
  fn non_uuid_subject_is_invalid() {
    let svc = service();
    let claims = Claims {
      sub: "u1".into(),
      iat: Utc::now().timestamp(),
      exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    let token = encode(
      &Header::new(Algorithm::HS256),
      &claims,
      &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();
    assert!(matches!(svc.verify(Some(&token)), Err(Error::InvalidToken)));
  }
}
