//! Pure aggregation functions.
//!
//! Date comparisons are date-only by construction: due dates are
//! `NaiveDate`, so midnight granularity needs no normalization step.

use crate::model::member::{MemberId, Role, TeamMember};
use crate::model::project::{Project, ProjectId, ProjectType};
use crate::model::task::{Priority, Task, TaskId};
use chrono::NaiveDate;

/// Maximum number of entries returned by [`upcoming_deadlines`].
pub const UPCOMING_DEADLINES_LIMIT: usize = 5;

/// Headline counters for the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    pub active_members: usize,
    /// Share of all tasks completed, rounded percent.
    pub completion_rate: u8,
}

/// Per-member workload statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub completion_rate: u8,
}

/// One row of the team performance ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub member_id: MemberId,
    pub full_name: String,
    pub role: Role,
    pub total: usize,
    pub completed: usize,
    pub completion_rate: u8,
}

/// Non-completed task annotated for the deadline list.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineEntry {
    pub task_id: TaskId,
    pub task_name: String,
    pub project_name: String,
    pub assignee_name: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    /// Whole days until the due date; negative when already overdue.
    pub days_left: i64,
}

/// Project count for one type; zero-count types are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCount {
    pub project_type: ProjectType,
    pub count: usize,
}

/// A task is overdue iff it is not completed and its due date is strictly
/// before `today`. Completed tasks are never overdue, regardless of date.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.is_completed() && task.due_date < today
}

/// Signed whole days between `today` and the due date.
pub fn days_until_due(task: &Task, today: NaiveDate) -> i64 {
    (task.due_date - today).num_days()
}

/// Completed share of a project's tasks as a rounded percent; 0 when the
/// project has no tasks.
pub fn project_progress(project_id: ProjectId, tasks: &[Task]) -> u8 {
    let mut total = 0;
    let mut completed = 0;
    for task in tasks.iter().filter(|task| task.project_id == project_id) {
        total += 1;
        if task.is_completed() {
            completed += 1;
        }
    }
    rounded_percent(completed, total)
}

/// Headline counters across all collections.
pub fn dashboard_stats(
    projects: &[Project],
    tasks: &[Task],
    members: &[TeamMember],
    today: NaiveDate,
) -> DashboardStats {
    let completed_tasks = tasks.iter().filter(|task| task.is_completed()).count();
    DashboardStats {
        total_projects: projects.len(),
        total_tasks: tasks.len(),
        completed_tasks,
        pending_tasks: tasks.len() - completed_tasks,
        overdue_tasks: tasks.iter().filter(|task| is_overdue(task, today)).count(),
        active_members: members.iter().filter(|member| member.is_active()).count(),
        completion_rate: rounded_percent(completed_tasks, tasks.len()),
    }
}

/// Workload statistics for one member's assigned tasks.
pub fn member_stats(member_id: MemberId, tasks: &[Task], today: NaiveDate) -> MemberStats {
    let mut total = 0;
    let mut completed = 0;
    let mut overdue = 0;
    for task in tasks.iter().filter(|task| task.assigned_to == Some(member_id)) {
        total += 1;
        if task.is_completed() {
            completed += 1;
        }
        if is_overdue(task, today) {
            overdue += 1;
        }
    }
    MemberStats {
        total,
        completed,
        pending: total - completed,
        overdue,
        completion_rate: rounded_percent(completed, total),
    }
}

/// Members with at least one assigned task, descending by completion rate.
///
/// Ties keep the input member order (stable sort).
pub fn team_leaderboard(members: &[TeamMember], tasks: &[Task]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = members
        .iter()
        .filter_map(|member| {
            let total = tasks
                .iter()
                .filter(|task| task.assigned_to == Some(member.id))
                .count();
            if total == 0 {
                return None;
            }
            let completed = tasks
                .iter()
                .filter(|task| task.assigned_to == Some(member.id) && task.is_completed())
                .count();
            Some(LeaderboardEntry {
                member_id: member.id,
                full_name: member.full_name(),
                role: member.role,
                total,
                completed,
                completion_rate: rounded_percent(completed, total),
            })
        })
        .collect();

    entries.sort_by(|a, b| b.completion_rate.cmp(&a.completion_rate));
    entries
}

/// Non-completed tasks annotated with days-left and resolved names, ascending
/// by `days_left`, truncated to [`UPCOMING_DEADLINES_LIMIT`].
///
/// Unresolvable references fall back to "Unknown" / "Unassigned" rather than
/// dropping the entry.
pub fn upcoming_deadlines(
    tasks: &[Task],
    projects: &[Project],
    members: &[TeamMember],
    today: NaiveDate,
) -> Vec<DeadlineEntry> {
    let mut entries: Vec<DeadlineEntry> = tasks
        .iter()
        .filter(|task| !task.is_completed())
        .map(|task| {
            let project_name = projects
                .iter()
                .find(|project| project.id == task.project_id)
                .map_or_else(|| "Unknown".to_string(), |project| project.name.clone());
            let assignee_name = task
                .assigned_to
                .and_then(|member_id| members.iter().find(|member| member.id == member_id))
                .map_or_else(|| "Unassigned".to_string(), TeamMember::full_name);
            DeadlineEntry {
                task_id: task.id,
                task_name: task.name.clone(),
                project_name,
                assignee_name,
                priority: task.priority,
                due_date: task.due_date,
                days_left: days_until_due(task, today),
            }
        })
        .collect();

    entries.sort_by_key(|entry| entry.days_left);
    entries.truncate(UPCOMING_DEADLINES_LIMIT);
    entries
}

/// Project counts per type, enum order, zero-count types excluded.
pub fn project_type_distribution(projects: &[Project]) -> Vec<TypeCount> {
    ProjectType::ALL
        .iter()
        .filter_map(|&project_type| {
            let count = projects
                .iter()
                .filter(|project| project.project_type == project_type)
                .count();
            (count > 0).then_some(TypeCount {
                project_type,
                count,
            })
        })
        .collect()
}

/// All currently-overdue tasks, input order.
pub fn overdue_tasks<'a>(tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| is_overdue(task, today))
        .collect()
}

/// Non-completed tasks due within `days` from `today` (inclusive, not yet
/// overdue). Feeds the deadline reminder sweep.
pub fn tasks_due_within<'a>(tasks: &'a [Task], today: NaiveDate, days: u32) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| {
            if task.is_completed() {
                return false;
            }
            let days_left = days_until_due(task, today);
            days_left >= 0 && days_left <= i64::from(days)
        })
        .collect()
}

fn rounded_percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u8
}
