use crate::error::TrackerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Data file format version written by this crate. Files stamped with a newer
/// version are refused on load.
pub const FILE_VERSION: u32 = 1;

/// The whole persisted state of the tracker.
///
/// # JSON shape
///
/// ```json
/// {
///   "meta": { "last_id": 2, "file_version": 1 },
///   "tracking": { "active": true, "project": 1, "started": "2026-01-29T10:00:00Z" },
///   "projects": {
///     "1": { "name": "Write spec", "history": [] },
///     "2": { "name": "Review spec", "history": [] }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub meta: Meta,
    pub tracking: Tracking,
    #[serde(default)]
    pub projects: BTreeMap<ProjectId, Project>,
}

impl Document {
    /// A fresh, empty document: no projects, nothing tracked.
    pub fn new() -> Self {
        Self {
            meta: Meta {
                last_id: 0,
                file_version: FILE_VERSION,
            },
            tracking: Tracking::Idle,
            projects: BTreeMap::new(),
        }
    }

    /// Checks the cross-field invariants that serde alone cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.meta.file_version > FILE_VERSION {
            return Err(format!(
                "unsupported file version {} (newest supported is {})",
                self.meta.file_version, FILE_VERSION
            ));
        }
        if let Some((id, _)) = self
            .projects
            .iter()
            .find(|(id, _)| id.get() == 0 || id.get() > self.meta.last_id)
        {
            return Err(format!(
                "project id {} is outside the issued range 1..={}",
                id, self.meta.last_id
            ));
        }
        if let Tracking::Active { project, .. } = self.tracking
            && !self.projects.contains_key(&project)
        {
            return Err(format!("tracking references missing project {}", project));
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Highest project id ever issued. Never decremented.
    pub last_id: u64,
    pub file_version: u32,
}

/// Stable, never-reused identifier of a project.
///
/// Serialized as a bare integer, and as a decimal string when used as a key
/// of the `projects` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(u64);

impl ProjectId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(TrackerError::InvalidInput(format!(
                "'{}' is not a valid project id",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub history: Vec<Session>,
}

/// A completed, immutable tracked interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub started: DateTime<Utc>,
    pub stopped: DateTime<Utc>,
    pub minutes: f64,
}

impl Session {
    /// Builds a session, clamping `stopped` so it never precedes `started`.
    pub fn new(started: DateTime<Utc>, stopped: DateTime<Utc>) -> Self {
        let stopped = stopped.max(started);
        Self {
            started,
            stopped,
            minutes: minutes_between(started, stopped),
        }
    }
}

/// Elapsed minutes rounded to two decimals; zero if `to` precedes `from`.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds().max(0) as f64;
    (millis / 600.0).round() / 100.0
}

/// The single global tracking slot.
///
/// Stored on disk as `{"active": bool, "project": id|null, "started": ts|null}`.
/// Any combination other than all-set or all-unset is rejected on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTracking", into = "RawTracking")]
pub enum Tracking {
    Idle,
    Active {
        project: ProjectId,
        started: DateTime<Utc>,
    },
}

impl Tracking {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn project(&self) -> Option<ProjectId> {
        match self {
            Self::Idle => None,
            Self::Active { project, .. } => Some(*project),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawTracking {
    active: bool,
    project: Option<ProjectId>,
    started: Option<DateTime<Utc>>,
}

impl TryFrom<RawTracking> for Tracking {
    type Error = String;

    fn try_from(raw: RawTracking) -> Result<Self, Self::Error> {
        match (raw.active, raw.project, raw.started) {
            (false, None, None) => Ok(Self::Idle),
            (true, Some(project), Some(started)) => Ok(Self::Active { project, started }),
            (true, _, _) => Err("active tracking needs both project and started".into()),
            (false, _, _) => Err("inactive tracking must not set project or started".into()),
        }
    }
}

impl From<Tracking> for RawTracking {
    fn from(tracking: Tracking) -> Self {
        match tracking {
            Tracking::Idle => Self {
                active: false,
                project: None,
                started: None,
            },
            Tracking::Active { project, started } => Self {
                active: true,
                project: Some(project),
                started: Some(started),
            },
        }
    }
}
