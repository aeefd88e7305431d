//! Derived views over the entity collections.
//!
//! # Responsibility
//! - Compute progress, overdue state, per-member statistics, leaderboards,
//!   deadline rankings and type distributions.
//!
//! # Invariants
//! - Every function is pure and recomputes from scratch on each call; there
//!   is no caching or incremental maintenance.
//! - "Today" is always an explicit caller-supplied date, never the wall
//!   clock, so results are reproducible in tests.

pub mod views;

pub use views::{
    dashboard_stats, days_until_due, is_overdue, member_stats, overdue_tasks, project_progress,
    project_type_distribution, tasks_due_within, team_leaderboard, upcoming_deadlines,
    DashboardStats, DeadlineEntry, LeaderboardEntry, MemberStats, TypeCount,
    UPCOMING_DEADLINES_LIMIT,
};
