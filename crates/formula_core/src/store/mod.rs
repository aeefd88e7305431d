//! In-memory entity store mirrored to durable key/value storage.
//!
//! # Responsibility
//! - Own the three ordered collections for the lifetime of the process.
//! - Hydrate them fail-soft at startup and persist each one whole after
//!   every mutation.
//!
//! # Invariants
//! - Insertion order is preserved; every lookup is a linear scan.
//! - A failed or malformed read degrades to an empty collection and never
//!   propagates; the degradation is logged.

pub mod entity_store;

pub use entity_store::EntityStore;
