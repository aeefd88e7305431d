//! Project domain model.
//!
//! # Invariants
//! - `start_date <= end_date`, enforced at creation only; there is no project
//!   update operation that could violate it later.
//! - `id` is stable and never reused for another project.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Discipline a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    FitOut,
    Millwork,
    Electrical,
    Mep,
    Management,
}

impl ProjectType {
    pub const ALL: [ProjectType; 5] = [
        ProjectType::FitOut,
        ProjectType::Millwork,
        ProjectType::Electrical,
        ProjectType::Mep,
        ProjectType::Management,
    ];

    /// Human-readable label used in summaries and notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::FitOut => "Fit-out",
            Self::Millwork => "Millwork",
            Self::Electrical => "Electrical",
            Self::Mep => "MEP",
            Self::Management => "Management",
        }
    }
}

/// Project lifecycle state. The core only assigns `Active` at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
}

/// Persisted project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub project_type: ProjectType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub client: Option<String>,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

/// Caller input for creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub project_type: ProjectType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub client: Option<String>,
    pub description: Option<String>,
}

impl NewProject {
    /// Checks creation-time invariants.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.start_date > self.end_date {
            return Err(ProjectValidationError::EndBeforeStart {
                start_date: self.start_date,
                end_date: self.end_date,
            });
        }
        Ok(())
    }
}

/// Validation failure for project input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EndBeforeStart {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndBeforeStart {
                start_date,
                end_date,
            } => write!(
                f,
                "project end date {end_date} is earlier than start date {start_date}"
            ),
        }
    }
}

impl Error for ProjectValidationError {}
