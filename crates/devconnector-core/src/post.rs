//! Posts, likes and comments.
//!
//! All mutation happens on an in-memory [`Post`] fetched from the store; the
//! caller persists the document afterwards. Every method checks its
//! precondition before touching state, so a failed call leaves the post
//! exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
  Result,
  collection::{Entry, SubCollection},
  error::{Error, Resource},
  identity::{Identity, User},
  ownership::ensure_owner,
};

// ─── Documents ───────────────────────────────────────────────────────────────

/// One identity's like on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
  pub user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  /// The author.
  pub user:       Uuid,
  /// Author display name at the time of writing.
  pub name:       String,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

impl Entry for Comment {
  fn entry_id(&self) -> Uuid { self.comment_id }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub post_id:    Uuid,
  /// The owner.
  pub user:       Uuid,
  pub name:       String,
  pub text:       String,
  /// Most recent like first; at most one entry per user.
  #[serde(default)]
  pub likes:      Vec<Like>,
  #[serde(default)]
  pub comments:   SubCollection<Comment>,
  pub created_at: DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Body of a new post or a new comment.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewText {
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "Text is required"))]
  pub text: String,
}

// ─── Behaviour ───────────────────────────────────────────────────────────────

impl Post {
  pub fn new(author: &User, input: NewText) -> Self {
    Self {
      post_id:    Uuid::new_v4(),
      user:       author.user_id,
      name:       author.name.clone(),
      text:       input.text,
      likes:      Vec::new(),
      comments:   SubCollection::new(),
      created_at: Utc::now(),
    }
  }

  fn like_position(&self, user_id: Uuid) -> Option<usize> {
    self.likes.iter().position(|l| l.user == user_id)
  }

  pub fn is_liked_by(&self, identity: &Identity) -> bool {
    self.like_position(identity.user_id).is_some()
  }

  /// Record a like from `identity`, newest first.
  pub fn like(&mut self, identity: &Identity) -> Result<()> {
    if self.is_liked_by(identity) {
      return Err(Error::AlreadyLiked);
    }
    self.likes.insert(0, Like { user: identity.user_id });
    Ok(())
  }

  /// Withdraw `identity`'s like.
  pub fn unlike(&mut self, identity: &Identity) -> Result<()> {
    let index = self.like_position(identity.user_id).ok_or(Error::NotLiked)?;
    self.likes.remove(index);
    Ok(())
  }

  /// Prepend a comment written by `author` and return it.
  pub fn add_comment(&mut self, author: &User, input: NewText) -> &Comment {
    self.comments.push_front(Comment {
      comment_id: Uuid::new_v4(),
      user:       author.user_id,
      name:       author.name.clone(),
      text:       input.text,
      created_at: Utc::now(),
    })
  }

  /// Remove a comment on behalf of its author.
  ///
  /// Unlike experience and education removal this is strict: the comment has
  /// to exist so its author can be checked.
  pub fn remove_comment(&mut self, identity: &Identity, comment_id: Uuid) -> Result<Comment> {
    let author = self
      .comments
      .get(comment_id)
      .map(|c| c.user)
      .ok_or(Error::NotFound(Resource::Comment))?;
    ensure_owner(identity, author, Resource::Comment)?;
    self
      .comments
      .remove(comment_id)
      .ok_or(Error::NotFound(Resource::Comment))
  }
}
