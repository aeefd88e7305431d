use chrono::NaiveDate;
use formula_core::db::{open_db, open_db_in_memory};
use formula_core::repo::{CollectionRepository, KEY_PROJECTS, KEY_TASKS};
use formula_core::{
    DashboardService, Department, EntityStore, NewProject, NewTask, NewTeamMember, Notifier,
    NotificationEvent, Priority, ProjectType, Role, SqliteCollectionRepository,
};

#[derive(Default)]
struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _event: &NotificationEvent) {}
}

#[test]
fn fresh_database_hydrates_empty_collections() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::load(SqliteCollectionRepository::new(&conn));

    assert!(store.projects().is_empty());
    assert!(store.tasks().is_empty());
    assert!(store.members().is_empty());
}

#[test]
fn collections_round_trip_field_for_field() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::load(SqliteCollectionRepository::new(&conn));
    let mut service = DashboardService::new(store, NullNotifier);

    let project = service
        .add_project(NewProject {
            name: "HQ fit-out".to_string(),
            project_type: ProjectType::FitOut,
            start_date: date(2026, 1, 5),
            end_date: date(2026, 6, 30),
            client: Some("Acme Holdings".to_string()),
            description: Some("Ground floor".to_string()),
        })
        .unwrap();

    let member = service
        .add_team_member(NewTeamMember {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            phone: Some("+1 555 0100".to_string()),
            role: Role::Senior,
            department: Department::FitOut,
            reports_to: None,
            hourly_rate: Some(85.5),
            notes: None,
        })
        .unwrap();

    let task = service
        .add_task(NewTask {
            project_id: project.id,
            name: "Demolition survey".to_string(),
            assigned_to: Some(member.id),
            priority: Priority::High,
            due_date: date(2026, 2, 1),
            description: None,
            files: Vec::new(),
        })
        .unwrap();

    let reloaded = EntityStore::load(SqliteCollectionRepository::new(&conn));
    assert_eq!(reloaded.projects(), &[project]);
    assert_eq!(reloaded.members(), &[member]);
    assert_eq!(reloaded.tasks(), &[task]);
}

#[test]
fn malformed_collection_degrades_to_empty_without_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCollectionRepository::new(&conn);
    {
        let store = EntityStore::load(SqliteCollectionRepository::new(&conn));
        let mut service = DashboardService::new(store, NullNotifier);
        service
            .add_project(NewProject {
                name: "Clinic MEP".to_string(),
                project_type: ProjectType::Mep,
                start_date: date(2026, 3, 1),
                end_date: date(2026, 9, 1),
                client: None,
                description: None,
            })
            .unwrap();
    }

    repo.write(KEY_TASKS, "{definitely not json").unwrap();

    let store = EntityStore::load(SqliteCollectionRepository::new(&conn));
    assert!(store.tasks().is_empty());
    assert_eq!(store.projects().len(), 1);
}

#[test]
fn insertion_order_is_preserved_across_reload() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::load(SqliteCollectionRepository::new(&conn));
    let mut service = DashboardService::new(store, NullNotifier);

    let names = ["Alpha", "Bravo", "Charlie", "Delta"];
    for name in names {
        service
            .add_project(NewProject {
                name: name.to_string(),
                project_type: ProjectType::Millwork,
                start_date: date(2026, 1, 1),
                end_date: date(2026, 12, 31),
                client: None,
                description: None,
            })
            .unwrap();
    }

    let reloaded = EntityStore::load(SqliteCollectionRepository::new(&conn));
    let reloaded_names: Vec<&str> = reloaded
        .projects()
        .iter()
        .map(|project| project.name.as_str())
        .collect();
    assert_eq!(reloaded_names, names);
}

#[test]
fn on_disk_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("formula.db");

    let project = {
        let conn = open_db(&db_path).unwrap();
        let store = EntityStore::load(SqliteCollectionRepository::new(&conn));
        let mut service = DashboardService::new(store, NullNotifier);
        service
            .add_project(NewProject {
                name: "Substation electrical".to_string(),
                project_type: ProjectType::Electrical,
                start_date: date(2026, 4, 1),
                end_date: date(2026, 8, 1),
                client: None,
                description: None,
            })
            .unwrap()
    };

    let conn = open_db(&db_path).unwrap();
    let raw = SqliteCollectionRepository::new(&conn)
        .read(KEY_PROJECTS)
        .unwrap();
    assert!(raw.is_some());

    let reloaded = EntityStore::load(SqliteCollectionRepository::new(&conn));
    assert_eq!(reloaded.projects(), &[project]);
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
