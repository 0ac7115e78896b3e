//! JSON body extractor that validates before the handler runs.

use axum::{
  Json,
  extract::{FromRequest, Request, rejection::JsonRejection},
};
use devconnector_core::{
  Error,
  error::FieldError,
  validate::validated,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// A request body that deserialized and passed its `validator` rules.
///
/// A body axum cannot read as `T` (wrong content type, malformed JSON, a
/// field of the wrong type) is reported the same way as a failed rule: 400
/// with an `errors` array.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Validate,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(body) = Json::<T>::from_request(req, state)
      .await
      .map_err(rejection_errors)?;
    Ok(ValidJson(validated(body)?))
  }
}

fn rejection_errors(rejection: JsonRejection) -> Error {
  tracing::debug!(%rejection, "unreadable request body");
  Error::Validation(vec![FieldError {
    param: "body".to_string(),
    msg:   rejection.body_text(),
  }])
}
