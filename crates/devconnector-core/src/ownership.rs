//! Ownership check for destructive operations.

use uuid::Uuid;

use crate::{
  Result,
  error::{Error, Resource},
  identity::Identity,
};

/// Fail with [`Error::NotOwner`] unless `identity` is the owner of the
/// loaded `resource`.
///
/// Call this after the document is fetched and before anything is mutated or
/// saved.
pub fn ensure_owner(identity: &Identity, owner: Uuid, resource: Resource) -> Result<()> {
  if identity.user_id != owner {
    return Err(Error::NotOwner(resource));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ErrorKind;

  #[test]
  fn owner_passes() {
    let id = Uuid::new_v4();
    assert!(ensure_owner(&Identity::new(id), id, Resource::Post).is_ok());
  }

  #[test]
  fn other_identity_is_forbidden() {
    let err = ensure_owner(&Identity::new(Uuid::new_v4()), Uuid::new_v4(), Resource::Comment)
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(err.to_string(), "no authorization to remove this comment");
  }

  #[test]
  fn nil_owner_is_forbidden() {
    let err = ensure_owner(&Identity::new(Uuid::new_v4()), Uuid::nil(), Resource::Post)
      .unwrap_err();
    assert!(matches!(err, Error::NotOwner(Resource::Post)));
  }
}
