//! Domain model for the construction dashboard.
//!
//! # Responsibility
//! - Define the typed records behind the three persisted collections.
//! - Keep "may be absent" fields explicit at the type level.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at creation time.
//! - Date-only fields use `NaiveDate`; instants use `DateTime<Utc>`.

pub mod member;
pub mod project;
pub mod task;
