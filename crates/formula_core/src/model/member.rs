//! Team member domain model.
//!
//! # Invariants
//! - `email` is unique across members, checked at creation time.
//! - `reports_to`, when set, names a currently-active member of strictly
//!   higher role level; the strict ordering makes reporting cycles
//!   unrepresentable.
//!
//! Full name and initials are derived accessors rather than stored fields, so
//! they can never drift from the name fields they are computed from.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a team member.
pub type MemberId = Uuid;

// Same permissive shape the original intake form used; anchoring is
// intentionally omitted.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

/// Organizational role with a fixed seniority level and display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ProjectManager,
    TeamLead,
    Senior,
    Junior,
    Client,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::ProjectManager => "Project Manager",
            Self::TeamLead => "Team Lead",
            Self::Senior => "Senior",
            Self::Junior => "Junior",
            Self::Client => "Client",
        }
    }

    /// Seniority level; higher outranks lower.
    pub fn level(self) -> u8 {
        match self {
            Self::ProjectManager => 5,
            Self::TeamLead => 4,
            Self::Senior => 3,
            Self::Junior => 2,
            Self::Client => 1,
        }
    }

    /// Fixed display color (hex).
    pub fn color(self) -> &'static str {
        match self {
            Self::ProjectManager => "#e74c3c",
            Self::TeamLead => "#e67e22",
            Self::Senior => "#f39c12",
            Self::Junior => "#27ae60",
            Self::Client => "#3498db",
        }
    }
}

/// Department; mirrors the project type disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Department {
    FitOut,
    Millwork,
    Electrical,
    Mep,
    Management,
}

impl Department {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Inactive,
}

/// Persisted team member record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub department: Department,
    pub reports_to: Option<MemberId>,
    pub hourly_rate: Option<f64>,
    pub notes: Option<String>,
    pub status: MemberStatus,
    pub joined_at: DateTime<Utc>,
}

impl TeamMember {
    /// "First Last" display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Two-letter uppercase initials.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

/// Caller input for creating a team member.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTeamMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub department: Department,
    pub reports_to: Option<MemberId>,
    pub hourly_rate: Option<f64>,
    pub notes: Option<String>,
}

impl NewTeamMember {
    /// Checks creation-time invariants local to the record.
    ///
    /// Email uniqueness and `reports_to` resolution need the full collection
    /// and are enforced at the service boundary.
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(MemberValidationError::BlankFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(MemberValidationError::BlankLastName);
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(MemberValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// Validation failure for member input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    BlankFirstName,
    BlankLastName,
    InvalidEmail(String),
}

impl Display for MemberValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankFirstName => write!(f, "first name cannot be blank"),
            Self::BlankLastName => write!(f, "last name cannot be blank"),
            Self::InvalidEmail(email) => write!(f, "invalid email address: `{email}`"),
        }
    }
}

impl Error for MemberValidationError {}
