//! Project registry operations on a loaded [`Document`].

use crate::error::{Result, TrackerError};
use crate::types::{Document, Project, ProjectId, Tracking};
use std::collections::btree_map;
use tracing::info;

/// Iterator over `(id, name)` in ascending id order.
#[derive(Debug, Clone)]
pub struct Projects<'a> {
    inner: btree_map::Iter<'a, ProjectId, Project>,
}

impl<'a> Iterator for Projects<'a> {
    type Item = (ProjectId, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(id, p)| (*id, p.name.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Projects<'_> {}

/// Outcome of [`Document::delete_project`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedProject {
    pub id: ProjectId,
    pub name: String,
    /// The project was being tracked; the running interval was discarded.
    pub cancelled_tracking: bool,
}

impl Document {
    /// Lists projects, or `None` when there are none at all.
    pub fn list_projects(&self) -> Option<Projects<'_>> {
        if self.projects.is_empty() {
            return None;
        }
        Some(Projects {
            inner: self.projects.iter(),
        })
    }

    pub fn project(&self, id: ProjectId) -> Result<&Project> {
        self.projects
            .get(&id)
            .ok_or(TrackerError::ProjectNotFound(id))
    }

    /// Registers a project under the next unused id.
    pub fn add_project(&mut self, name: &str) -> Result<(ProjectId, String)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::InvalidInput(
                "You must specify a project name".into(),
            ));
        }
        let next = self.meta.last_id.checked_add(1).ok_or_else(|| {
            TrackerError::InvalidInput("project id space exhausted".into())
        })?;
        let id = ProjectId::new(next);
        self.meta.last_id = next;
        self.projects.insert(
            id,
            Project {
                name: name.to_string(),
                history: Vec::new(),
            },
        );
        info!(%id, name, "added project");
        Ok((id, name.to_string()))
    }

    /// Removes a project and its history. `meta.last_id` is left alone so the
    /// id is never handed out again. Deleting the tracked project resets
    /// tracking to idle.
    pub fn delete_project(&mut self, id: ProjectId) -> Result<DeletedProject> {
        let project = self
            .projects
            .remove(&id)
            .ok_or(TrackerError::ProjectNotFound(id))?;

        let cancelled_tracking = self.tracking.project() == Some(id);
        if cancelled_tracking {
            self.tracking = Tracking::Idle;
        }
        info!(%id, name = %project.name, cancelled_tracking, "deleted project");
        Ok(DeletedProject {
            id,
            name: project.name,
            cancelled_tracking,
        })
    }
}
