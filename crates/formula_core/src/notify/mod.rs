//! Notification boundary.
//!
//! # Responsibility
//! - Define the event payloads the mutation API emits after a successful
//!   state change.
//! - Render qualifying events into the capped, persisted email log.
//!
//! # Invariants
//! - No delivery channel exists: a "send" is a structured log entry plus an
//!   application log line, nothing else.
//! - The mutation path never waits on or fails because of a notification.

pub mod email;

pub use email::{
    DeadlineReminderNotice, EmailLogEntry, EmailNotifier, EmailSettings, EmailStatus,
    NotificationEvent, NotificationToggles, Notifier, OverdueTaskLine, OverdueTasksNotice,
    Recipient, TaskAssignedNotice, TaskCompletedNotice, EMAIL_LOG_CAP,
};
