//! Dashboard mutation service.
//!
//! # Responsibility
//! - Provide the create/update/delete entry points for all three entities,
//!   including cross-collection cascades.
//! - Emit notification events after successful state changes.
//!
//! # Invariants
//! - Every operation is synchronous and side-effect-complete before it
//!   returns; notifications are fire-and-forget and cannot fail a mutation.
//! - Update/delete on an unknown identifier reports `NotFound` instead of
//!   silently succeeding, and logs the miss.
//! - Cascades write one collection at a time; there is no cross-key
//!   atomicity (a deliberate gap inherited from the persisted layout).

use crate::analytics;
use crate::model::member::{
    Department, MemberId, MemberStatus, MemberValidationError, NewTeamMember, Role, TeamMember,
};
use crate::model::project::{
    NewProject, Project, ProjectId, ProjectStatus, ProjectValidationError,
};
use crate::model::task::{NewTask, Priority, Task, TaskId, TaskStatus};
use crate::notify::{
    DeadlineReminderNotice, NotificationEvent, Notifier, OverdueTaskLine, OverdueTasksNotice,
    Recipient, TaskAssignedNotice, TaskCompletedNotice,
};
use crate::repo::{CollectionRepository, RepoError};
use crate::store::EntityStore;
use chrono::{NaiveDate, Utc};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level error for mutation operations.
#[derive(Debug)]
pub enum ServiceError {
    InvalidProject(ProjectValidationError),
    InvalidMember(MemberValidationError),
    /// Another member already uses this email address.
    DuplicateEmail(String),
    /// `reports_to` does not name an active member of strictly higher level.
    InvalidReportsTo(MemberId),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProject(err) => write!(f, "{err}"),
            Self::InvalidMember(err) => write!(f, "{err}"),
            Self::DuplicateEmail(email) => {
                write!(f, "email address already in use: `{email}`")
            }
            Self::InvalidReportsTo(member_id) => write!(
                f,
                "reports_to must name an active member of higher level: {member_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidProject(err) => Some(err),
            Self::InvalidMember(err) => Some(err),
            Self::DuplicateEmail(_) | Self::InvalidReportsTo(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ProjectValidationError> for ServiceError {
    fn from(value: ProjectValidationError) -> Self {
        Self::InvalidProject(value)
    }
}

impl From<MemberValidationError> for ServiceError {
    fn from(value: MemberValidationError) -> Self {
        Self::InvalidMember(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result of an update by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

/// Result of a delete by identifier; deletes are idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Field merge for [`DashboardService::update_task`]. `None` leaves the field
/// unchanged; `assigned_to` is doubly optional so the assignee can be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
    pub progress: Option<u8>,
    pub assigned_to: Option<Option<MemberId>>,
}

/// Field merge for [`DashboardService::update_team_member`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub role: Option<Role>,
    pub department: Option<Department>,
    pub reports_to: Option<Option<MemberId>>,
    pub hourly_rate: Option<Option<f64>>,
    pub notes: Option<Option<String>>,
    pub status: Option<MemberStatus>,
}

/// Owns the entity store and the notification boundary.
pub struct DashboardService<R: CollectionRepository, N: Notifier> {
    store: EntityStore<R>,
    notifier: N,
}

impl<R: CollectionRepository, N: Notifier> DashboardService<R, N> {
    pub fn new(store: EntityStore<R>, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &EntityStore<R> {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Creates a project.
    ///
    /// # Contract
    /// - Validates `start_date <= end_date`.
    /// - Assigns id and creation timestamp, status `Active`.
    /// - Returns the created record.
    pub fn add_project(&mut self, input: NewProject) -> ServiceResult<Project> {
        input.validate()?;

        let project = Project {
            id: Uuid::now_v7(),
            name: input.name,
            project_type: input.project_type,
            start_date: input.start_date,
            end_date: input.end_date,
            client: input.client,
            description: input.description,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        };

        self.store.projects_mut().push(project.clone());
        self.store.save_projects()?;
        info!(
            "event=project_added module=service status=ok project_id={} type={}",
            project.id,
            project.project_type.label()
        );
        Ok(project)
    }

    /// Creates a task with default status `Pending` and progress 0.
    ///
    /// # Contract
    /// - Emits a `TaskAssigned` event when the assignee and owning project
    ///   both resolve; an unresolved reference skips the event with a log.
    /// - A dangling `project_id` is tolerated, matching the persisted data
    ///   the original tool produced.
    pub fn add_task(&mut self, input: NewTask) -> ServiceResult<Task> {
        let task = Task {
            id: Uuid::now_v7(),
            project_id: input.project_id,
            name: input.name,
            assigned_to: input.assigned_to,
            priority: input.priority,
            due_date: input.due_date,
            description: input.description,
            status: TaskStatus::Pending,
            progress: 0,
            completed_at: None,
            files: input.files,
            created_at: Utc::now(),
        };

        self.store.tasks_mut().push(task.clone());
        self.store.save_tasks()?;
        info!(
            "event=task_added module=service status=ok task_id={} project_id={}",
            task.id, task.project_id
        );

        if let Some(event) = self.build_assignment_event(&task) {
            self.notifier.notify(&event);
        }
        Ok(task)
    }

    /// Merges `patch` into the task with `id`.
    ///
    /// # Contract
    /// - `Pending -> Completed` stamps `completed_at` and emits a
    ///   `TaskCompleted` event; `Completed -> Pending` clears it.
    /// - Unknown id reports `NotFound`.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> ServiceResult<UpdateOutcome> {
        let Some(index) = self.store.tasks().iter().position(|task| task.id == id) else {
            debug!("event=task_update module=service status=skip reason=not_found task_id={id}");
            return Ok(UpdateOutcome::NotFound);
        };

        let was_completed = self.store.tasks()[index].is_completed();
        {
            let task = &mut self.store.tasks_mut()[index];
            if let Some(name) = patch.name {
                task.name = name;
            }
            if let Some(description) = patch.description {
                task.description = Some(description);
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = due_date;
            }
            if let Some(progress) = patch.progress {
                task.progress = progress;
            }
            if let Some(assigned_to) = patch.assigned_to {
                task.assigned_to = assigned_to;
            }
            if let Some(status) = patch.status {
                task.status = status;
                match status {
                    TaskStatus::Completed if !was_completed => {
                        task.completed_at = Some(Utc::now());
                    }
                    TaskStatus::Pending => {
                        task.completed_at = None;
                    }
                    TaskStatus::Completed => {}
                }
            }
        }
        self.store.save_tasks()?;

        let now_completed = self.store.tasks()[index].is_completed();
        if !was_completed && now_completed {
            let task = self.store.tasks()[index].clone();
            info!(
                "event=task_completed module=service status=ok task_id={}",
                task.id
            );
            if let Some(event) = self.build_completion_event(&task) {
                self.notifier.notify(&event);
            }
        }
        Ok(UpdateOutcome::Updated)
    }

    /// Removes the task with `id`; removing an unknown id is a no-op.
    pub fn delete_task(&mut self, id: TaskId) -> ServiceResult<DeleteOutcome> {
        let Some(index) = self.store.tasks().iter().position(|task| task.id == id) else {
            debug!("event=task_delete module=service status=skip reason=not_found task_id={id}");
            return Ok(DeleteOutcome::NotFound);
        };
        self.store.tasks_mut().remove(index);
        self.store.save_tasks()?;
        info!("event=task_deleted module=service status=ok task_id={id}");
        Ok(DeleteOutcome::Deleted)
    }

    /// Removes the project with `id` and cascades to its tasks.
    ///
    /// Two collection writes; a crash between them can orphan tasks.
    pub fn delete_project(&mut self, id: ProjectId) -> ServiceResult<DeleteOutcome> {
        let Some(index) = self
            .store
            .projects()
            .iter()
            .position(|project| project.id == id)
        else {
            debug!(
                "event=project_delete module=service status=skip reason=not_found project_id={id}"
            );
            return Ok(DeleteOutcome::NotFound);
        };

        self.store.projects_mut().remove(index);
        self.store.save_projects()?;

        let before = self.store.tasks().len();
        self.store.tasks_mut().retain(|task| task.project_id != id);
        let cascaded = before - self.store.tasks().len();
        self.store.save_tasks()?;

        info!(
            "event=project_deleted module=service status=ok project_id={id} cascaded_tasks={cascaded}"
        );
        Ok(DeleteOutcome::Deleted)
    }

    /// Creates a team member.
    ///
    /// # Contract
    /// - Validates names and email format.
    /// - Rejects an email already used by any member.
    /// - `reports_to`, when set, must name a currently-active member of
    ///   strictly higher role level.
    pub fn add_team_member(&mut self, input: NewTeamMember) -> ServiceResult<TeamMember> {
        input.validate()?;

        let email = input.email.trim().to_string();
        if self.store.members().iter().any(|member| member.email == email) {
            return Err(ServiceError::DuplicateEmail(email));
        }

        if let Some(manager_id) = input.reports_to {
            let qualifies = self.store.members().iter().any(|member| {
                member.id == manager_id
                    && member.is_active()
                    && member.role.level() > input.role.level()
            });
            if !qualifies {
                return Err(ServiceError::InvalidReportsTo(manager_id));
            }
        }

        let member = TeamMember {
            id: Uuid::now_v7(),
            first_name: input.first_name,
            last_name: input.last_name,
            email,
            phone: input.phone,
            role: input.role,
            department: input.department,
            reports_to: input.reports_to,
            hourly_rate: input.hourly_rate,
            notes: input.notes,
            status: MemberStatus::Active,
            joined_at: Utc::now(),
        };

        self.store.members_mut().push(member.clone());
        self.store.save_members()?;
        info!(
            "event=member_added module=service status=ok member_id={} role={}",
            member.id,
            member.role.label()
        );
        Ok(member)
    }

    /// Merges `patch` into the member with `id`.
    ///
    /// Email uniqueness is a creation-time check and is not re-validated
    /// here, matching the original behavior.
    pub fn update_team_member(
        &mut self,
        id: MemberId,
        patch: MemberPatch,
    ) -> ServiceResult<UpdateOutcome> {
        let Some(index) = self.store.members().iter().position(|member| member.id == id) else {
            debug!(
                "event=member_update module=service status=skip reason=not_found member_id={id}"
            );
            return Ok(UpdateOutcome::NotFound);
        };

        {
            let member = &mut self.store.members_mut()[index];
            if let Some(first_name) = patch.first_name {
                member.first_name = first_name;
            }
            if let Some(last_name) = patch.last_name {
                member.last_name = last_name;
            }
            if let Some(email) = patch.email {
                member.email = email;
            }
            if let Some(phone) = patch.phone {
                member.phone = phone;
            }
            if let Some(role) = patch.role {
                member.role = role;
            }
            if let Some(department) = patch.department {
                member.department = department;
            }
            if let Some(reports_to) = patch.reports_to {
                member.reports_to = reports_to;
            }
            if let Some(hourly_rate) = patch.hourly_rate {
                member.hourly_rate = hourly_rate;
            }
            if let Some(notes) = patch.notes {
                member.notes = notes;
            }
            if let Some(status) = patch.status {
                member.status = status;
            }
        }
        self.store.save_members()?;
        Ok(UpdateOutcome::Updated)
    }

    /// Removes the member with `id` and unassigns their tasks.
    ///
    /// Members reporting to the deleted member keep their `reports_to`
    /// reference; the dangling id is tolerated downstream.
    pub fn delete_team_member(&mut self, id: MemberId) -> ServiceResult<DeleteOutcome> {
        let Some(index) = self.store.members().iter().position(|member| member.id == id) else {
            debug!(
                "event=member_delete module=service status=skip reason=not_found member_id={id}"
            );
            return Ok(DeleteOutcome::NotFound);
        };

        self.store.members_mut().remove(index);
        self.store.save_members()?;

        let mut unassigned = 0;
        for task in self.store.tasks_mut().iter_mut() {
            if task.assigned_to == Some(id) {
                task.assigned_to = None;
                unassigned += 1;
            }
        }
        self.store.save_tasks()?;

        info!(
            "event=member_deleted module=service status=ok member_id={id} unassigned_tasks={unassigned}"
        );
        Ok(DeleteOutcome::Deleted)
    }

    /// Emits a `DeadlineReminder` event for every assigned, non-completed
    /// task due within `lead_days` of `today`. Returns the number of events
    /// emitted. On-demand; nothing schedules this.
    pub fn send_deadline_reminders(&mut self, today: NaiveDate, lead_days: u32) -> usize {
        let mut events = Vec::new();
        for task in analytics::tasks_due_within(self.store.tasks(), today, lead_days) {
            let Some(member_id) = task.assigned_to else {
                continue;
            };
            let Some(member) = self
                .store
                .members()
                .iter()
                .find(|member| member.id == member_id)
            else {
                debug!(
                    "event=deadline_reminder module=service status=skip reason=unknown_member task_id={}",
                    task.id
                );
                continue;
            };
            events.push(NotificationEvent::DeadlineReminder(DeadlineReminderNotice {
                task_name: task.name.clone(),
                assignee_name: member.full_name(),
                assignee_email: member.email.clone(),
                project_name: self.project_name_or_unknown(task.project_id),
                priority: task.priority,
                due_date: task.due_date,
                days_left: analytics::days_until_due(task, today),
            }));
        }

        let count = events.len();
        for event in &events {
            self.notifier.notify(event);
        }
        count
    }

    /// Emits a single `OverdueTasks` digest to every active project manager
    /// and team lead when at least one task is overdue. Returns the overdue
    /// task count. On-demand; nothing schedules this.
    pub fn send_overdue_alert(&mut self, today: NaiveDate) -> usize {
        let lines: Vec<OverdueTaskLine> = analytics::overdue_tasks(self.store.tasks(), today)
            .into_iter()
            .map(|task| OverdueTaskLine {
                task_name: task.name.clone(),
                project_name: self.project_name_or_unknown(task.project_id),
                assignee_name: task
                    .assigned_to
                    .and_then(|member_id| {
                        self.store
                            .members()
                            .iter()
                            .find(|member| member.id == member_id)
                    })
                    .map_or_else(|| "Unassigned".to_string(), TeamMember::full_name),
                due_date: task.due_date,
            })
            .collect();

        if lines.is_empty() {
            return 0;
        }

        let count = lines.len();
        let event = NotificationEvent::OverdueTasks(OverdueTasksNotice {
            tasks: lines,
            recipients: managers_and_leads(self.store.members()),
        });
        self.notifier.notify(&event);
        count
    }

    fn build_assignment_event(&self, task: &Task) -> Option<NotificationEvent> {
        let member_id = task.assigned_to?;
        let member = self
            .store
            .members()
            .iter()
            .find(|member| member.id == member_id);
        let project = self
            .store
            .projects()
            .iter()
            .find(|project| project.id == task.project_id);

        let (Some(member), Some(project)) = (member, project) else {
            debug!(
                "event=task_assigned module=service status=skip reason=unresolved_reference task_id={}",
                task.id
            );
            return None;
        };

        Some(NotificationEvent::TaskAssigned(TaskAssignedNotice {
            task_name: task.name.clone(),
            assignee_name: member.full_name(),
            assignee_email: member.email.clone(),
            project_name: project.name.clone(),
            priority: task.priority,
            due_date: task.due_date,
            description: task.description.clone(),
        }))
    }

    fn build_completion_event(&self, task: &Task) -> Option<NotificationEvent> {
        let member_id = task.assigned_to?;
        let completed_at = task.completed_at?;
        let member = self
            .store
            .members()
            .iter()
            .find(|member| member.id == member_id);
        let project = self
            .store
            .projects()
            .iter()
            .find(|project| project.id == task.project_id);

        let (Some(member), Some(project)) = (member, project) else {
            debug!(
                "event=task_completed module=service status=skip reason=unresolved_reference task_id={}",
                task.id
            );
            return None;
        };

        Some(NotificationEvent::TaskCompleted(TaskCompletedNotice {
            task_name: task.name.clone(),
            assignee_name: member.full_name(),
            assignee_email: member.email.clone(),
            project_name: project.name.clone(),
            completed_at,
            on_time: completed_at.date_naive() <= task.due_date,
            recipients: managers_and_leads(self.store.members()),
        }))
    }

    fn project_name_or_unknown(&self, project_id: ProjectId) -> String {
        self.store
            .projects()
            .iter()
            .find(|project| project.id == project_id)
            .map_or_else(|| "Unknown".to_string(), |project| project.name.clone())
    }
}

/// Active project managers and team leads, the recipients of digest-style
/// notifications.
fn managers_and_leads(members: &[TeamMember]) -> Vec<Recipient> {
    members
        .iter()
        .filter(|member| {
            member.is_active()
                && matches!(member.role, Role::ProjectManager | Role::TeamLead)
        })
        .map(|member| Recipient {
            name: member.full_name(),
            email: member.email.clone(),
        })
        .collect()
}
