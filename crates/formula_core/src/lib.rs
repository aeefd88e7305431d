//! Core domain logic for the Formula construction dashboard.
//! This crate is the single source of truth for business invariants.

pub mod analytics;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod store;

pub use analytics::{
    dashboard_stats, days_until_due, is_overdue, member_stats, project_progress,
    project_type_distribution, team_leaderboard, upcoming_deadlines, DashboardStats,
    DeadlineEntry, LeaderboardEntry, MemberStats, TypeCount, UPCOMING_DEADLINES_LIMIT,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::member::{
    Department, MemberId, MemberStatus, NewTeamMember, Role, TeamMember,
};
pub use model::project::{NewProject, Project, ProjectId, ProjectStatus, ProjectType};
pub use model::task::{FileAttachment, NewTask, Priority, Task, TaskId, TaskStatus};
pub use notify::{
    EmailLogEntry, EmailNotifier, EmailSettings, NotificationEvent, NotificationToggles, Notifier,
    EMAIL_LOG_CAP,
};
pub use repo::{CollectionRepository, RepoError, RepoResult, SqliteCollectionRepository};
pub use service::{
    DashboardService, DeleteOutcome, MemberPatch, ServiceError, ServiceResult, TaskPatch,
    UpdateOutcome,
};
pub use store::EntityStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
