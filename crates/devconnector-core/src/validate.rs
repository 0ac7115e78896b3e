//! Boundary validation.
//!
//! Request payloads derive [`validator::Validate`]; [`validated`] runs the
//! derived checks and folds any failures into [`Error::Validation`] so that
//! transports can report every rejected field at once.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
  Result,
  error::{Error, FieldError},
};

/// Validate `input` and hand it back if every field passes.
pub fn validated<T: Validate>(input: T) -> Result<T> {
  input.validate().map_err(|e| Error::Validation(field_errors(&e)))?;
  Ok(input)
}

/// Flatten validator output into `(param, msg)` pairs, sorted by field name
/// for a stable response.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
  let mut out: Vec<FieldError> = errors
    .field_errors()
    .into_iter()
    .flat_map(|(field, errs)| {
      errs.iter().map(move |e| FieldError {
        param: field.to_string(),
        msg:   e
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| format!("{field} is invalid")),
      })
    })
    .collect();
  out.sort_by(|a, b| a.param.cmp(&b.param));
  out
}

// ─── Lenient field decoding ──────────────────────────────────────────────────

/// Read `null` as the type's default, so a required string sent as `null`
/// reaches its length rule instead of failing to deserialize.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read `null` and blank strings as absent.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// `custom` rule for date fields carried as strings.
pub fn valid_date(raw: &str) -> Result<(), ValidationError> {
  parse_date(raw)
    .map(|_| ())
    .ok_or_else(|| ValidationError::new("date"))
}

/// Turn a date field into a [`NaiveDate`], failing as a validation error
/// on `param` when it is absent or malformed.
pub fn date_field(param: &str, raw: Option<&str>) -> Result<NaiveDate> {
  raw.and_then(parse_date).ok_or_else(|| {
    Error::Validation(vec![FieldError {
      param: param.to_string(),
      msg:   format!("{param} is not a valid date"),
    }])
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::identity::NewUser;

  #[test]
  fn passes_valid_input_through() {
    let input = NewUser {
      name:     "Ada".into(),
      email:    "ada@example.com".into(),
      password: "hunter22".into(),
    };
    let out = validated(input).unwrap();
    assert_eq!(out.name, "Ada");
  }

  #[test]
  fn collects_every_failed_field() {
    let err = validated(NewUser::default()).unwrap_err();
    let Error::Validation(fields) = err else {
      panic!("expected validation error, got {err:?}");
    };
    let params: Vec<_> = fields.iter().map(|f| f.param.as_str()).collect();
    assert_eq!(params, ["email", "name", "password"]);
    assert_eq!(fields[1].msg, "Name is required");
  }

  #[test]
  fn null_strings_reach_the_length_rule() {
    let input: NewUser = serde_json::from_value(serde_json::json!({
      "name": null, "email": "ada@example.com", "password": "hunter22"
    }))
    .unwrap();
    let Err(Error::Validation(fields)) = validated(input) else {
      panic!("expected validation error");
    };
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].param, "name");
  }

  #[test]
  fn dates_accept_plain_and_rfc3339() {
    let want = NaiveDate::from_ymd_opt(2020, 1, 2);
    assert_eq!(parse_date("2020-01-02"), want);
    assert_eq!(parse_date("2020-01-02T10:00:00Z"), want);
    assert_eq!(parse_date(""), None);
    assert_eq!(parse_date("02/01/2020"), None);
  }

  #[test]
  fn missing_date_field_is_a_validation_error() {
    let Err(Error::Validation(fields)) = date_field("from", None) else {
      panic!("expected validation error");
    };
    assert_eq!(fields[0].param, "from");
    assert!(date_field("from", Some("2020-01-02")).is_ok());
  }
}
