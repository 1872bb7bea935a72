//! The tracking state machine: `Idle --start--> Active --stop--> Idle`.
//!
//! Only one session may run at a time across all projects. Stopping appends
//! the finished interval to the tracked project's history.

use crate::error::{Result, TrackerError};
use crate::types::{Document, ProjectId, Session, Tracking, minutes_between};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Outcome of [`Document::stop_tracking`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoppedSession {
    pub project: ProjectId,
    pub name: String,
    pub session: Session,
}

/// Aggregate over a project's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub project: ProjectId,
    pub name: String,
    pub sessions: usize,
    pub total_minutes: f64,
    pub first_started: Option<DateTime<Utc>>,
    pub last_stopped: Option<DateTime<Utc>>,
}

/// Snapshot of the tracking slot for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    Idle,
    Active {
        project: ProjectId,
        name: String,
        started: DateTime<Utc>,
        elapsed_minutes: f64,
    },
}

impl Document {
    pub fn start_tracking(&mut self, id: ProjectId, now: DateTime<Utc>) -> Result<()> {
        self.project(id)?;
        if let Tracking::Active { project, .. } = self.tracking {
            return Err(TrackerError::AlreadyActive(project));
        }
        self.tracking = Tracking::Active {
            project: id,
            started: now,
        };
        info!(%id, started = %now, "started tracking");
        Ok(())
    }

    pub fn stop_tracking(&mut self, now: DateTime<Utc>) -> Result<StoppedSession> {
        let Tracking::Active { project, started } = self.tracking else {
            return Err(TrackerError::NotActive);
        };
        let target = self
            .projects
            .get_mut(&project)
            .ok_or(TrackerError::ProjectNotFound(project))?;

        let session = Session::new(started, now);
        target.history.push(session.clone());
        self.tracking = Tracking::Idle;
        info!(%project, minutes = session.minutes, "stopped tracking");

        Ok(StoppedSession {
            project,
            name: target.name.clone(),
            session,
        })
    }

    /// Full history of a project, oldest first.
    pub fn history(&self, id: ProjectId) -> Result<&[Session]> {
        Ok(&self.project(id)?.history)
    }

    pub fn report(&self, id: ProjectId) -> Result<Report> {
        let project = self.project(id)?;
        let total_minutes = project.history.iter().map(|s| s.minutes).sum::<f64>();
        Ok(Report {
            project: id,
            name: project.name.clone(),
            sessions: project.history.len(),
            total_minutes: (total_minutes * 100.0).round() / 100.0,
            first_started: project.history.first().map(|s| s.started),
            last_stopped: project.history.last().map(|s| s.stopped),
        })
    }

    pub fn status(&self, now: DateTime<Utc>) -> Status {
        match self.tracking {
            Tracking::Idle => Status::Idle,
            Tracking::Active { project, started } => Status::Active {
                project,
                name: self
                    .projects
                    .get(&project)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                started,
                elapsed_minutes: minutes_between(started, now),
            },
        }
    }
}
