//! Task domain model.
//!
//! # Invariants
//! - `status` transitions are binary and reversible (pending <-> completed);
//!   the service layer stamps/clears `completed_at` on each transition.
//! - `project_id` is required; `assigned_to` is nulled (not cascaded) when the
//!   referenced member is deleted.

use crate::model::member::MemberId;
use crate::model::project::ProjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Task urgency with the fixed display color used by notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    /// Fixed display color (hex).
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#27ae60",
            Self::Medium => "#f39c12",
            Self::High => "#e67e22",
            Self::Urgent => "#e74c3c",
        }
    }
}

/// Binary task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// Descriptor for a file attached to a task.
///
/// `local_ref` is a transient blob handle from the uploading session; it is
/// persisted verbatim but carries no meaning across processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub local_ref: Option<String>,
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub name: String,
    pub assigned_to: Option<MemberId>,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Informational only; not derived from or reconciled with `status`.
    pub progress: u8,
    pub completed_at: Option<DateTime<Utc>>,
    pub files: Vec<FileAttachment>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Caller input for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub project_id: ProjectId,
    pub name: String,
    pub assigned_to: Option<MemberId>,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub description: Option<String>,
    pub files: Vec<FileAttachment>,
}
