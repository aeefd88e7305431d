//! Entity store implementation.

use crate::model::member::TeamMember;
use crate::model::project::Project;
use crate::model::task::Task;
use crate::repo::{
    read_collection, write_collection, CollectionRepository, RepoResult, KEY_PROJECTS, KEY_TASKS,
    KEY_TEAM_MEMBERS,
};
use log::{info, warn};
use serde::de::DeserializeOwned;

/// Owns the three collections and the persistence handle.
///
/// Constructed once at startup and handed to the service layer; aggregation
/// functions borrow the collections as slices.
pub struct EntityStore<R: CollectionRepository> {
    repo: R,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    members: Vec<TeamMember>,
}

impl<R: CollectionRepository> EntityStore<R> {
    /// Hydrates all collections from storage.
    ///
    /// Absent keys and unreadable or malformed values degrade to an empty
    /// collection (fail-soft); each degradation emits a `warn!` event.
    pub fn load(repo: R) -> Self {
        let projects = load_collection(&repo, KEY_PROJECTS);
        let tasks = load_collection(&repo, KEY_TASKS);
        let members = load_collection(&repo, KEY_TEAM_MEMBERS);

        info!(
            "event=store_hydrate module=store status=ok projects={} tasks={} members={}",
            projects.len(),
            tasks.len(),
            members.len()
        );

        Self {
            repo,
            projects,
            tasks,
            members,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub(crate) fn projects_mut(&mut self) -> &mut Vec<Project> {
        &mut self.projects
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    pub(crate) fn members_mut(&mut self) -> &mut Vec<TeamMember> {
        &mut self.members
    }

    /// Persists the full project collection under its key.
    pub(crate) fn save_projects(&self) -> RepoResult<()> {
        write_collection(&self.repo, KEY_PROJECTS, &self.projects)
    }

    /// Persists the full task collection under its key.
    pub(crate) fn save_tasks(&self) -> RepoResult<()> {
        write_collection(&self.repo, KEY_TASKS, &self.tasks)
    }

    /// Persists the full member collection under its key.
    pub(crate) fn save_members(&self) -> RepoResult<()> {
        write_collection(&self.repo, KEY_TEAM_MEMBERS, &self.members)
    }
}

fn load_collection<T: DeserializeOwned>(repo: &impl CollectionRepository, key: &str) -> Vec<T> {
    match read_collection::<Vec<T>>(repo, key) {
        Ok(Some(items)) => items,
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!(
                "event=store_hydrate module=store status=degraded key={key} error={err}"
            );
            Vec::new()
        }
    }
}
