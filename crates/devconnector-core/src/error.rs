//! Error types for `devconnector-core`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The kind of document an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
  User,
  Profile,
  Post,
  Comment,
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Resource::User => "user",
      Resource::Profile => "profile",
      Resource::Post => "post",
      Resource::Comment => "comment",
    })
  }
}

/// A single rejected field from boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub param: String,
  pub msg:   String,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("no token, authorization denied")]
  MissingToken,

  #[error("token is not valid")]
  InvalidToken,

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("no authorization to remove this {0}")]
  NotOwner(Resource),

  #[error("{0} not found")]
  NotFound(Resource),

  #[error("post already liked")]
  AlreadyLiked,

  #[error("post has not yet been liked")]
  NotLiked,

  #[error("user already exists")]
  UserExists,

  #[error("validation failed")]
  Validation(Vec<FieldError>),

  #[error("token encoding error: {0}")]
  TokenEncoding(#[source] jsonwebtoken::errors::Error),
}

/// Coarse classification used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Unauthorized,
  Forbidden,
  NotFound,
  Conflict,
  ValidationFailed,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::MissingToken | Error::InvalidToken | Error::InvalidCredentials => {
        ErrorKind::Unauthorized
      }
      Error::NotOwner(_) => ErrorKind::Forbidden,
      Error::NotFound(_) => ErrorKind::NotFound,
      Error::AlreadyLiked | Error::NotLiked | Error::UserExists => {
        ErrorKind::Conflict
      }
      Error::Validation(_) => ErrorKind::ValidationFailed,
      Error::TokenEncoding(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_map_to_transport_classes() {
    let encoding =
      jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat);
    let cases = [
      (Error::MissingToken, ErrorKind::Unauthorized),
      (Error::InvalidCredentials, ErrorKind::Unauthorized),
      (Error::NotOwner(Resource::Post), ErrorKind::Forbidden),
      (Error::NotFound(Resource::Comment), ErrorKind::NotFound),
      (Error::UserExists, ErrorKind::Conflict),
      (Error::Validation(Vec::new()), ErrorKind::ValidationFailed),
      (Error::TokenEncoding(encoding), ErrorKind::Internal),
    ];
    for (err, kind) in cases {
      assert_eq!(err.kind(), kind, "{err}");
    }
  }
}
