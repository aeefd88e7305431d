//! Email settings, notification payloads and the logging-only notifier.

use crate::model::task::Priority;
use crate::repo::{
    read_collection, write_collection, CollectionRepository, RepoResult, KEY_EMAIL_LOGS,
    KEY_EMAIL_SETTINGS,
};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of retained email log entries; oldest are dropped.
pub const EMAIL_LOG_CAP: usize = 50;

/// Per-notification-type opt-in toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationToggles {
    pub task_assigned: bool,
    pub deadline_reminder: bool,
    pub task_completed: bool,
    pub overdue_tasks: bool,
    pub project_updates: bool,
}

impl Default for NotificationToggles {
    fn default() -> Self {
        Self {
            task_assigned: true,
            deadline_reminder: true,
            task_completed: false,
            overdue_tasks: true,
            project_updates: false,
        }
    }
}

/// Mail transport configuration; persisted under `email_settings`.
///
/// `enabled` gates everything. The transport fields are carried for the
/// settings screen but never dialed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub enabled: bool,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub email: String,
    pub password: String,
    pub sender_name: String,
    pub notifications: NotificationToggles,
    /// Lead time for deadline reminders, in days.
    pub reminder_days: u32,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: String::new(),
            smtp_port: 587,
            email: String::new(),
            password: String::new(),
            sender_name: "Formula Project Management".to_string(),
            notifications: NotificationToggles::default(),
            reminder_days: 2,
        }
    }
}

/// Someone a rendered notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

/// Payload for a task assigned to a member at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskAssignedNotice {
    pub task_name: String,
    pub assignee_name: String,
    pub assignee_email: String,
    pub project_name: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub description: Option<String>,
}

/// Payload for a task transitioning to completed.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCompletedNotice {
    pub task_name: String,
    pub assignee_name: String,
    pub assignee_email: String,
    pub project_name: String,
    pub completed_at: DateTime<Utc>,
    pub on_time: bool,
    /// Active project managers and team leads at emission time.
    pub recipients: Vec<Recipient>,
}

/// Payload for an on-demand reminder about a task due soon.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineReminderNotice {
    pub task_name: String,
    pub assignee_name: String,
    pub assignee_email: String,
    pub project_name: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub days_left: i64,
}

/// One overdue task inside an [`OverdueTasksNotice`] digest.
#[derive(Debug, Clone, PartialEq)]
pub struct OverdueTaskLine {
    pub task_name: String,
    pub project_name: String,
    pub assignee_name: String,
    pub due_date: NaiveDate,
}

/// Digest of all currently-overdue tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct OverdueTasksNotice {
    pub tasks: Vec<OverdueTaskLine>,
    /// Active project managers and team leads at emission time.
    pub recipients: Vec<Recipient>,
}

/// Event emitted by the mutation API after a successful state change.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    TaskAssigned(TaskAssignedNotice),
    TaskCompleted(TaskCompletedNotice),
    DeadlineReminder(DeadlineReminderNotice),
    OverdueTasks(OverdueTasksNotice),
}

impl NotificationEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::TaskAssigned(_) => "task_assigned",
            Self::TaskCompleted(_) => "task_completed",
            Self::DeadlineReminder(_) => "deadline_reminder",
            Self::OverdueTasks(_) => "overdue_tasks",
        }
    }
}

/// Consumer side of the notification boundary.
///
/// Implementations must be fire-and-forget: they may not fail the mutation
/// path, so internal errors are logged and swallowed.
pub trait Notifier {
    fn notify(&mut self, event: &NotificationEvent);
}

/// Delivery status of a logged entry. Only `Sent` exists today because the
/// mock transport cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailStatus {
    Sent,
}

/// One rendered email, newest-first in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailLogEntry {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub status: EmailStatus,
}

/// Logging-only notifier backed by the shared collection storage.
pub struct EmailNotifier<R: CollectionRepository> {
    repo: R,
    settings: EmailSettings,
    logs: VecDeque<EmailLogEntry>,
}

impl<R: CollectionRepository> EmailNotifier<R> {
    /// Hydrates settings and the email log; absent or malformed state
    /// degrades to defaults / an empty log.
    pub fn load(repo: R) -> Self {
        let settings = match read_collection::<EmailSettings>(&repo, KEY_EMAIL_SETTINGS) {
            Ok(Some(settings)) => settings,
            Ok(None) => EmailSettings::default(),
            Err(err) => {
                warn!("event=email_settings_load module=notify status=degraded error={err}");
                EmailSettings::default()
            }
        };
        let logs = match read_collection::<Vec<EmailLogEntry>>(&repo, KEY_EMAIL_LOGS) {
            Ok(Some(entries)) => VecDeque::from(entries),
            Ok(None) => VecDeque::new(),
            Err(err) => {
                warn!("event=email_log_load module=notify status=degraded error={err}");
                VecDeque::new()
            }
        };
        Self {
            repo,
            settings,
            logs,
        }
    }

    pub fn settings(&self) -> &EmailSettings {
        &self.settings
    }

    /// Replaces and persists the settings record.
    pub fn update_settings(&mut self, settings: EmailSettings) -> RepoResult<()> {
        write_collection(&self.repo, KEY_EMAIL_SETTINGS, &settings)?;
        self.settings = settings;
        info!("event=email_settings_saved module=notify status=ok");
        Ok(())
    }

    /// Newest-first view of the retained log.
    pub fn logs(&self) -> impl Iterator<Item = &EmailLogEntry> {
        self.logs.iter()
    }

    pub fn log_count(&self) -> usize {
        self.logs.len()
    }

    /// Drops all retained entries, in memory and in storage.
    pub fn clear_logs(&mut self) -> RepoResult<()> {
        self.logs.clear();
        self.repo.remove(KEY_EMAIL_LOGS)
    }

    fn enabled_for(&self, event: &NotificationEvent) -> bool {
        if !self.settings.enabled {
            return false;
        }
        let toggles = &self.settings.notifications;
        match event {
            NotificationEvent::TaskAssigned(_) => toggles.task_assigned,
            NotificationEvent::TaskCompleted(_) => toggles.task_completed,
            NotificationEvent::DeadlineReminder(_) => toggles.deadline_reminder,
            NotificationEvent::OverdueTasks(_) => toggles.overdue_tasks,
        }
    }

    fn push_entry(&mut self, recipient: String, subject: String, body: String) {
        self.logs.push_front(EmailLogEntry {
            recipient,
            subject,
            body,
            timestamp: Utc::now(),
            status: EmailStatus::Sent,
        });
        self.logs.truncate(EMAIL_LOG_CAP);
    }

    fn persist_logs(&self) {
        let entries: Vec<&EmailLogEntry> = self.logs.iter().collect();
        if let Err(err) = write_collection(&self.repo, KEY_EMAIL_LOGS, &entries) {
            warn!("event=email_log_save module=notify status=error error={err}");
        }
    }
}

impl<R: CollectionRepository> Notifier for EmailNotifier<R> {
    fn notify(&mut self, event: &NotificationEvent) {
        if !self.enabled_for(event) {
            debug!(
                "event=email_skipped module=notify status=skip kind={} reason=disabled",
                event.kind()
            );
            return;
        }

        let rendered = render(event);
        if rendered.is_empty() {
            return;
        }

        let count = rendered.len();
        for (recipient, subject, body) in rendered {
            info!(
                "event=email_logged module=notify status=ok kind={} recipient={recipient} subject={subject:?}",
                event.kind()
            );
            self.push_entry(recipient, subject, body);
        }
        self.persist_logs();
        debug!(
            "event=email_batch module=notify status=ok kind={} entries={count}",
            event.kind()
        );
    }
}

fn render(event: &NotificationEvent) -> Vec<(String, String, String)> {
    match event {
        NotificationEvent::TaskAssigned(notice) => {
            let subject = format!("New Task Assigned: {}", notice.task_name);
            let mut body = format!(
                "Task: {}\nProject: {}\nAssigned to: {}\nPriority: {}\nDue date: {}",
                notice.task_name,
                notice.project_name,
                notice.assignee_name,
                notice.priority.label(),
                notice.due_date
            );
            if let Some(description) = &notice.description {
                body.push_str("\nDescription: ");
                body.push_str(description);
            }
            vec![(notice.assignee_email.clone(), subject, body)]
        }
        NotificationEvent::TaskCompleted(notice) => {
            let subject = format!("Task Completed: {}", notice.task_name);
            let body = format!(
                "Task: {}\nProject: {}\nCompleted by: {}\nCompleted on: {}\nStatus: {}",
                notice.task_name,
                notice.project_name,
                notice.assignee_name,
                notice.completed_at.format("%Y-%m-%d %H:%M"),
                if notice.on_time { "ON TIME" } else { "LATE" }
            );
            notice
                .recipients
                .iter()
                .map(|recipient| (recipient.email.clone(), subject.clone(), body.clone()))
                .collect()
        }
        NotificationEvent::DeadlineReminder(notice) => {
            let subject = format!(
                "Deadline Reminder: {} (Due in {} day{})",
                notice.task_name,
                notice.days_left,
                if notice.days_left > 1 { "s" } else { "" }
            );
            let body = format!(
                "Task: {}\nProject: {}\nAssigned to: {}\nPriority: {}\nDue date: {}",
                notice.task_name,
                notice.project_name,
                notice.assignee_name,
                notice.priority.label(),
                notice.due_date
            );
            vec![(notice.assignee_email.clone(), subject, body)]
        }
        NotificationEvent::OverdueTasks(notice) => {
            let count = notice.tasks.len();
            let subject = format!(
                "Overdue Tasks Alert - {count} task{} require attention",
                if count > 1 { "s" } else { "" }
            );
            let lines: Vec<String> = notice
                .tasks
                .iter()
                .map(|line| {
                    format!(
                        "- {} (project: {}, due: {}, assigned: {})",
                        line.task_name, line.project_name, line.due_date, line.assignee_name
                    )
                })
                .collect();
            let body = format!("Overdue tasks:\n{}", lines.join("\n"));
            notice
                .recipients
                .iter()
                .map(|recipient| (recipient.email.clone(), subject.clone(), body.clone()))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EmailSettings, NotificationToggles};

    #[test]
    fn settings_defaults_match_the_shipped_configuration() {
        let settings = EmailSettings::default();
        assert!(!settings.enabled);
        assert_eq!(settings.smtp_port, 587);
        assert_eq!(settings.sender_name, "Formula Project Management");
        assert_eq!(settings.reminder_days, 2);

        let toggles = NotificationToggles::default();
        assert!(toggles.task_assigned);
        assert!(toggles.deadline_reminder);
        assert!(toggles.overdue_tasks);
        assert!(!toggles.task_completed);
        assert!(!toggles.project_updates);
    }

    #[test]
    fn partial_settings_json_fills_defaults() {
        let settings: EmailSettings = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.smtp_port, 587);
        assert!(settings.notifications.task_assigned);
    }
}
