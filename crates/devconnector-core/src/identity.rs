//! Identity and user accounts.
//!
//! An [`Identity`] is what the token gate hands to a handler: nothing more
//! than the user id that was encoded at issuance. A [`User`] is the stored
//! account document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The authenticated subject of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub user_id: Uuid,
}

impl Identity {
  pub fn new(user_id: Uuid) -> Self { Self { user_id } }
}

/// A registered account. `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

impl User {
  /// Build a new account. The caller hashes the password first.
  pub fn new(name: String, email: String, password_hash: String) -> Self {
    Self {
      user_id: Uuid::new_v4(),
      name,
      email: normalize_email(&email),
      password_hash,
      created_at: Utc::now(),
    }
  }

  /// The client-facing shape, without the password hash.
  pub fn public(&self) -> PublicUser {
    PublicUser {
      user_id:    self.user_id,
      name:       self.name.clone(),
      email:      self.email.clone(),
      created_at: self.created_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
  pub user_id:    Uuid,
  pub name:       String,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewUser {
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "Name is required"))]
  pub name:     String,
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(email(message = "Please include a valid email"))]
  pub email:    String,
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 6, message = "Please enter a password with 6 or more characters"))]
  pub password: String,
}

/// Login payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Login {
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(email(message = "Please include a valid email"))]
  pub email:    String,
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_user_normalizes_email() {
    let user = User::new("Ada".into(), "  Ada@Example.COM ".into(), "h".into());
    assert_eq!(user.email, "ada@example.com");
  }

  #[test]
  fn public_view_has_no_hash() {
    let user = User::new("Ada".into(), "ada@example.com".into(), "secret-hash".into());
    let json = serde_json::to_string(&user.public()).unwrap();
    assert!(!json.contains("secret-hash"));
    assert!(json.contains("ada@example.com"));
  }
}
