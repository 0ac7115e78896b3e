//! SQLite implementation of [`DocumentStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use devconnector_core::{
  identity::User,
  post::Post,
  profile::Profile,
  store::DocumentStore,
};

use crate::{
  Error, Result,
  encode::{RawUser, decode_doc, decode_docs, encode_doc, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A DevConnector document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single `doc` column.
  async fn query_doc(&self, sql: &'static str, key: String) -> Result<Option<String>> {
    let doc: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![key], |row| row.get(0))
            .optional()?,
        )
      })
      .await?;
    Ok(doc)
  }

  /// Fetch every `doc` column a query returns, in query order.
  async fn query_docs(&self, sql: &'static str) -> Result<Vec<String>> {
    let docs: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(docs)
  }

  /// Run a single keyed DELETE and return the number of removed rows.
  async fn delete_where(&self, sql: &'static str, key: String) -> Result<usize> {
    let n: usize = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![key])?))
      .await?;
    Ok(n)
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn insert_user(&self, user: &User) -> Result<bool> {
    let id_str   = encode_uuid(user.user_id);
    let name     = user.name.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();
    let at_str   = encode_dt(user.created_at);

    let inserted: usize = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT OR IGNORE INTO users (user_id, name, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, email, hash, at_str],
        )?;
        Ok(n)
      })
      .await?;

    if inserted == 0 {
      tracing::debug!(email = %user.email, "email already registered");
    }
    Ok(inserted > 0)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM users WHERE user_id = ?1", RawUser::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = devconnector_core::identity::normalize_email(email);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", RawUser::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![email], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
    let n = self
      .delete_where("DELETE FROM users WHERE user_id = ?1", encode_uuid(user_id))
      .await?;
    Ok(n > 0)
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn save_post(&self, post: &Post) -> Result<()> {
    let id_str   = encode_uuid(post.post_id);
    let user_str = encode_uuid(post.user);
    let at_str   = encode_dt(post.created_at);
    let doc      = encode_doc(post)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, user_id, created_at, doc) VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(post_id) DO UPDATE SET doc = excluded.doc",
          rusqlite::params![id_str, user_str, at_str, doc],
        )?;
        Ok(())
      })
      .await?;

    tracing::trace!(post_id = %post.post_id, "post saved");
    Ok(())
  }

  async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
    self
      .query_doc("SELECT doc FROM posts WHERE post_id = ?1", encode_uuid(post_id))
      .await?
      .as_deref()
      .map(decode_doc)
      .transpose()
  }

  async fn list_posts(&self) -> Result<Vec<Post>> {
    let rows = self
      .query_docs("SELECT doc FROM posts ORDER BY created_at DESC, rowid DESC")
      .await?;
    decode_docs(rows)
  }

  async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
    let n = self
      .delete_where("DELETE FROM posts WHERE post_id = ?1", encode_uuid(post_id))
      .await?;
    Ok(n > 0)
  }

  async fn delete_posts_by_user(&self, user_id: Uuid) -> Result<usize> {
    self
      .delete_where("DELETE FROM posts WHERE user_id = ?1", encode_uuid(user_id))
      .await
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn save_profile(&self, profile: &Profile) -> Result<()> {
    let id_str   = encode_uuid(profile.profile_id);
    let user_str = encode_uuid(profile.user);
    let at_str   = encode_dt(profile.created_at);
    let doc      = encode_doc(profile)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (profile_id, user_id, created_at, doc) VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(user_id) DO UPDATE SET profile_id = excluded.profile_id, doc = excluded.doc",
          rusqlite::params![id_str, user_str, at_str, doc],
        )?;
        Ok(())
      })
      .await?;

    tracing::trace!(profile_id = %profile.profile_id, "profile saved");
    Ok(())
  }

  async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
    self
      .query_doc("SELECT doc FROM profiles WHERE user_id = ?1", encode_uuid(user_id))
      .await?
      .as_deref()
      .map(decode_doc)
      .transpose()
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let rows = self
      .query_docs("SELECT doc FROM profiles ORDER BY created_at ASC, rowid ASC")
      .await?;
    decode_docs(rows)
  }

  async fn delete_profile_by_user(&self, user_id: Uuid) -> Result<bool> {
    let n = self
      .delete_where("DELETE FROM profiles WHERE user_id = ?1", encode_uuid(user_id))
      .await?;
    Ok(n > 0)
  }
}
