use chrono::NaiveDate;
use formula_core::db::open_db_in_memory;
use formula_core::notify::{EmailNotifier, EmailSettings};
use formula_core::repo::{CollectionRepository, KEY_EMAIL_LOGS, KEY_EMAIL_SETTINGS};
use formula_core::{
    DashboardService, Department, EntityStore, NewProject, NewTask, NewTeamMember, Priority,
    ProjectType, Role, SqliteCollectionRepository, TaskPatch, TaskStatus, EMAIL_LOG_CAP,
};
use rusqlite::Connection;

type Service<'conn> = DashboardService<
    SqliteCollectionRepository<'conn>,
    EmailNotifier<SqliteCollectionRepository<'conn>>,
>;

fn service_with_settings(conn: &Connection, settings: EmailSettings) -> Service<'_> {
    let mut notifier = EmailNotifier::load(SqliteCollectionRepository::new(conn));
    notifier.update_settings(settings).unwrap();
    let store = EntityStore::load(SqliteCollectionRepository::new(conn));
    DashboardService::new(store, notifier)
}

fn enabled_settings() -> EmailSettings {
    EmailSettings {
        enabled: true,
        ..EmailSettings::default()
    }
}

#[test]
fn disabled_service_logs_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service_with_settings(&conn, EmailSettings::default());

    seed_assigned_task(&mut service, (2026, 9, 1));
    assert_eq!(service.notifier().log_count(), 0);
}

#[test]
fn assignment_renders_subject_recipient_and_persists() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service_with_settings(&conn, enabled_settings());

    let (task, member) = seed_assigned_task(&mut service, (2026, 9, 1));

    assert_eq!(service.notifier().log_count(), 1);
    let entry = service.notifier().logs().next().unwrap();
    assert_eq!(entry.subject, format!("New Task Assigned: {}", task.name));
    assert_eq!(entry.recipient, member.email);
    assert!(entry.body.contains("Project: Clinic"));
    assert!(entry.body.contains("Assigned to: Jane Doe"));

    // The log survives under its fixed key.
    let raw = SqliteCollectionRepository::new(&conn)
        .read(KEY_EMAIL_LOGS)
        .unwrap()
        .unwrap();
    assert!(raw.contains("New Task Assigned"));

    // And a fresh notifier hydrates it.
    let reloaded = EmailNotifier::load(SqliteCollectionRepository::new(&conn));
    assert_eq!(reloaded.log_count(), 1);
}

#[test]
fn completion_notice_honors_its_default_off_toggle() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service_with_settings(&conn, enabled_settings());

    let (task, _member) = seed_assigned_task(&mut service, (2026, 9, 1));
    service
        .update_task(
            task.id,
            TaskPatch {
                status: Some(TaskStatus::Completed),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    // Only the assignment entry exists; task_completed defaults to off.
    assert_eq!(service.notifier().log_count(), 1);
}

#[test]
fn completion_notice_goes_to_active_managers_and_leads() {
    let conn = open_db_in_memory().unwrap();
    let mut settings = enabled_settings();
    settings.notifications.task_completed = true;
    settings.notifications.task_assigned = false;
    let mut service = service_with_settings(&conn, settings);

    let manager = service
        .add_team_member(member_input("Mara", "Manager", "mara@example.com", Role::ProjectManager))
        .unwrap();
    let lead = service
        .add_team_member(member_input("Liam", "Lead", "liam@example.com", Role::TeamLead))
        .unwrap();
    // Far-future due date keeps the on-time flag independent of the wall clock.
    let (task, _member) = seed_assigned_task(&mut service, (2126, 1, 1));

    service
        .update_task(
            task.id,
            TaskPatch {
                status: Some(TaskStatus::Completed),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    let recipients: Vec<&str> = service
        .notifier()
        .logs()
        .map(|entry| entry.recipient.as_str())
        .collect();
    assert_eq!(recipients.len(), 2);
    assert!(recipients.contains(&manager.email.as_str()));
    assert!(recipients.contains(&lead.email.as_str()));

    let entry = service.notifier().logs().next().unwrap();
    assert_eq!(entry.subject, format!("Task Completed: {}", task.name));
    assert!(entry.body.contains("ON TIME"));
}

#[test]
fn log_is_capped_and_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service_with_settings(&conn, enabled_settings());

    let project = service
        .add_project(project_input("Clinic"))
        .unwrap();
    let member = service
        .add_team_member(member_input("Jane", "Doe", "jane.doe@example.com", Role::Senior))
        .unwrap();

    for index in 0..(EMAIL_LOG_CAP + 10) {
        service
            .add_task(NewTask {
                project_id: project.id,
                name: format!("Task {index}"),
                assigned_to: Some(member.id),
                priority: Priority::Low,
                due_date: date((2026, 9, 1)),
                description: None,
                files: Vec::new(),
            })
            .unwrap();
    }

    assert_eq!(service.notifier().log_count(), EMAIL_LOG_CAP);
    let newest = service.notifier().logs().next().unwrap();
    assert_eq!(
        newest.subject,
        format!("New Task Assigned: Task {}", EMAIL_LOG_CAP + 9)
    );
}

#[test]
fn clear_logs_removes_memory_and_storage() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service_with_settings(&conn, enabled_settings());

    seed_assigned_task(&mut service, (2026, 9, 1));
    assert_eq!(service.notifier().log_count(), 1);

    service.notifier_mut().clear_logs().unwrap();
    assert_eq!(service.notifier().log_count(), 0);
    assert!(SqliteCollectionRepository::new(&conn)
        .read(KEY_EMAIL_LOGS)
        .unwrap()
        .is_none());
}

#[test]
fn settings_round_trip_and_malformed_fallback() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut notifier = EmailNotifier::load(SqliteCollectionRepository::new(&conn));
        let mut settings = enabled_settings();
        settings.smtp_server = "mail.example.com".to_string();
        notifier.update_settings(settings).unwrap();
    }

    let reloaded = EmailNotifier::load(SqliteCollectionRepository::new(&conn));
    assert!(reloaded.settings().enabled);
    assert_eq!(reloaded.settings().smtp_server, "mail.example.com");

    SqliteCollectionRepository::new(&conn)
        .write(KEY_EMAIL_SETTINGS, "][ broken")
        .unwrap();
    let degraded = EmailNotifier::load(SqliteCollectionRepository::new(&conn));
    assert_eq!(degraded.settings(), &EmailSettings::default());
}

#[test]
fn deadline_reminders_cover_the_lead_window() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service_with_settings(&conn, enabled_settings());

    let project = service.add_project(project_input("Clinic")).unwrap();
    let member = service
        .add_team_member(member_input("Jane", "Doe", "jane.doe@example.com", Role::Senior))
        .unwrap();

    // Due today, due at the edge of the window, outside it, overdue,
    // unassigned, and completed.
    for (name, due, assigned) in [
        ("due-today", (2026, 8, 6), Some(member.id)),
        ("due-edge", (2026, 8, 8), Some(member.id)),
        ("due-later", (2026, 8, 20), Some(member.id)),
        ("overdue", (2026, 8, 1), Some(member.id)),
        ("unassigned", (2026, 8, 7), None),
    ] {
        service
            .add_task(NewTask {
                project_id: project.id,
                name: name.to_string(),
                assigned_to: assigned,
                priority: Priority::Urgent,
                due_date: date(due),
                description: None,
                files: Vec::new(),
            })
            .unwrap();
    }

    let before = service.notifier().log_count();
    let sent = service.send_deadline_reminders(date((2026, 8, 6)), 2);
    assert_eq!(sent, 2);

    let subjects: Vec<String> = service
        .notifier()
        .logs()
        .take(service.notifier().log_count() - before)
        .map(|entry| entry.subject.clone())
        .collect();
    assert!(subjects.iter().any(|s| s.contains("due-today")));
    assert!(subjects.iter().any(|s| s.contains("due-edge")));
}

#[test]
fn overdue_alert_digests_to_each_manager() {
    let conn = open_db_in_memory().unwrap();
    let mut settings = enabled_settings();
    settings.notifications.task_assigned = false;
    let mut service = service_with_settings(&conn, settings);

    let project = service.add_project(project_input("Clinic")).unwrap();
    service
        .add_team_member(member_input("Mara", "Manager", "mara@example.com", Role::ProjectManager))
        .unwrap();
    service
        .add_team_member(member_input("Liam", "Lead", "liam@example.com", Role::TeamLead))
        .unwrap();
    service
        .add_team_member(member_input("Jay", "Junior", "jay@example.com", Role::Junior))
        .unwrap();

    service
        .add_task(NewTask {
            project_id: project.id,
            name: "Late punch list".to_string(),
            assigned_to: None,
            priority: Priority::High,
            due_date: date((2026, 8, 1)),
            description: None,
            files: Vec::new(),
        })
        .unwrap();

    let overdue = service.send_overdue_alert(date((2026, 8, 6)));
    assert_eq!(overdue, 1);

    // One digest entry per manager/lead; the junior gets nothing.
    assert_eq!(service.notifier().log_count(), 2);
    let entry = service.notifier().logs().next().unwrap();
    assert_eq!(entry.subject, "Overdue Tasks Alert - 1 task require attention");
    assert!(entry.body.contains("Late punch list"));
    assert!(entry.body.contains("Unassigned"));
}

#[test]
fn overdue_alert_with_nothing_overdue_is_silent() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service_with_settings(&conn, enabled_settings());

    assert_eq!(service.send_overdue_alert(date((2026, 8, 6))), 0);
    assert_eq!(service.notifier().log_count(), 0);
}

fn seed_assigned_task(
    service: &mut Service<'_>,
    due: (i32, u32, u32),
) -> (formula_core::Task, formula_core::TeamMember) {
    let project = service.add_project(project_input("Clinic")).unwrap();
    let member = service
        .add_team_member(member_input("Jane", "Doe", "jane.doe@example.com", Role::Senior))
        .unwrap();
    let task = service
        .add_task(NewTask {
            project_id: project.id,
            name: "Install counters".to_string(),
            assigned_to: Some(member.id),
            priority: Priority::Medium,
            due_date: date(due),
            description: None,
            files: Vec::new(),
        })
        .unwrap();
    (task, member)
}

fn project_input(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        project_type: ProjectType::FitOut,
        start_date: date((2026, 1, 1)),
        end_date: date((2026, 12, 31)),
        client: None,
        description: None,
    }
}

fn member_input(first: &str, last: &str, email: &str, role: Role) -> NewTeamMember {
    NewTeamMember {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone: None,
        role,
        department: Department::Management,
        reports_to: None,
        hourly_rate: None,
        notes: None,
    }
}

fn date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
