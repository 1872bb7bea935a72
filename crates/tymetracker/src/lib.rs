//! Personal time tracking backed by a single JSON data file.
//!
//! The data file holds every project, each project's history of finished
//! sessions, and the one global tracking slot. Each operation loads the whole
//! document, applies one change, and writes the whole document back.
//!
//! # Example
//!
//! ```rust,no_run
//! use tymetracker::{PathResolver, Tracker};
//!
//! let tracker = Tracker::open(&PathResolver::new())?;
//! tracker.init()?;
//!
//! let (id, _) = tracker.add_project("Write spec")?;
//! tracker.start(id)?;
//! let stopped = tracker.stop()?;
//! println!("{} minutes on {}", stopped.session.minutes, stopped.name);
//! # Ok::<(), tymetracker::TrackerError>(())
//! ```

pub mod error;
pub mod paths;
pub mod registry;
pub mod store;
pub mod tracking;
pub mod types;

pub use error::{ErrorKind, Result, TrackerError};
pub use paths::{DATA_FILE_ENV, DEFAULT_FILE_NAME, PathResolver};
pub use registry::{DeletedProject, Projects};
pub use store::{Store, StoreLock};
pub use tracking::{Report, Status, StoppedSession};
pub use types::{Document, FILE_VERSION, Meta, Project, ProjectId, Session, Tracking};

use chrono::Utc;
use std::path::Path;

/// High-level entry point: one load-mutate-save cycle per call.
///
/// Mutating calls hold the store's advisory lock for the whole cycle and only
/// write when the mutation succeeds. Read-only calls never write.
#[derive(Debug, Clone)]
pub struct Tracker {
    store: Store,
}

impl Tracker {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Opens the tracker at the data file chosen by `resolver`.
    pub fn open(resolver: &PathResolver) -> Result<Self> {
        Ok(Self::new(Store::new(resolver.data_file()?)))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Creates the data file. Fails if one already exists.
    pub fn init(&self) -> Result<()> {
        self.store.initialize().map(|_| ())
    }

    /// Loads the document and hands it to `f` without saving.
    pub fn read<T>(&self, f: impl FnOnce(&Document) -> Result<T>) -> Result<T> {
        let doc = self.store.load()?;
        f(&doc)
    }

    /// Loads the document under lock, applies `f`, and saves if `f` succeeds.
    pub fn update<T>(&self, f: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let _lock = self.store.lock()?;
        let mut doc = self.store.load()?;
        let out = f(&mut doc)?;
        self.store.save(&doc)?;
        Ok(out)
    }

    pub fn add_project(&self, name: &str) -> Result<(ProjectId, String)> {
        self.update(|doc| doc.add_project(name))
    }

    pub fn delete_project(&self, id: ProjectId) -> Result<DeletedProject> {
        self.update(|doc| doc.delete_project(id))
    }

    pub fn start(&self, id: ProjectId) -> Result<()> {
        self.update(|doc| doc.start_tracking(id, Utc::now()))
    }

    pub fn stop(&self) -> Result<StoppedSession> {
        self.update(|doc| doc.stop_tracking(Utc::now()))
    }

    pub fn history(&self, id: ProjectId) -> Result<Vec<Session>> {
        self.read(|doc| doc.history(id).map(<[Session]>::to_vec))
    }

    pub fn report(&self, id: ProjectId) -> Result<Report> {
        self.read(|doc| doc.report(id))
    }

    pub fn status(&self) -> Result<Status> {
        self.read(|doc| Ok(doc.status(Utc::now())))
    }
}
