//! Persistence boundary for the dashboard collections.
//!
//! # Responsibility
//! - Define the key/value contract every collection is mirrored through.
//! - Isolate SQLite details from the store and notifier layers.
//!
//! # Invariants
//! - Each collection is written whole under its fixed key; there is no
//!   partial update and no cross-key transaction.

pub mod collection_repo;

pub use collection_repo::{
    read_collection, write_collection, CollectionRepository, RepoError, RepoResult,
    SqliteCollectionRepository, KEY_EMAIL_LOGS, KEY_EMAIL_SETTINGS, KEY_PROJECTS, KEY_TASKS,
    KEY_TEAM_MEMBERS,
};
