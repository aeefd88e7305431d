//! Collection repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Read/write whole serialized collections under fixed keys.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Writes replace the previous value for the key (UPSERT semantics).
//! - Keys are fixed at compile time; callers never invent new ones.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed storage key for the project collection.
pub const KEY_PROJECTS: &str = "projects";
/// Fixed storage key for the task collection.
pub const KEY_TASKS: &str = "tasks";
/// Fixed storage key for the team member collection.
pub const KEY_TEAM_MEMBERS: &str = "team_members";
/// Fixed storage key for the email configuration record.
pub const KEY_EMAIL_SETTINGS: &str = "email_settings";
/// Fixed storage key for the capped email log.
pub const KEY_EMAIL_LOGS: &str = "email_logs";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error for collection reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "collection serialization failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Storage contract for whole-collection persistence.
pub trait CollectionRepository {
    /// Returns the serialized document stored under `key`, if any.
    fn read(&self, key: &str) -> RepoResult<Option<String>>;
    /// Replaces the document stored under `key`.
    fn write(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes the document stored under `key`; missing keys are a no-op.
    fn remove(&self, key: &str) -> RepoResult<()>;
}

/// Deserializes the collection stored under `key`.
pub fn read_collection<T: DeserializeOwned>(
    repo: &impl CollectionRepository,
    key: &str,
) -> RepoResult<Option<T>> {
    match repo.read(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Serializes `value` and stores it under `key`.
pub fn write_collection<T: Serialize>(
    repo: &impl CollectionRepository,
    key: &str,
    value: &T,
) -> RepoResult<()> {
    let json = serde_json::to_string(value)?;
    repo.write(key, &json)
}

/// SQLite-backed collection repository.
pub struct SqliteCollectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCollectionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CollectionRepository for SqliteCollectionRepository<'_> {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM collections WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO collections (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM collections WHERE key = ?1;", [key])?;
        Ok(())
    }
}
