//! Mutation API for the dashboard core.
//!
//! # Responsibility
//! - Orchestrate store mutations, cascades and notification events.
//! - Keep callers decoupled from storage and notification details.

pub mod dashboard_service;

pub use dashboard_service::{
    DashboardService, DeleteOutcome, MemberPatch, ServiceError, ServiceResult, TaskPatch,
    UpdateOutcome,
};
