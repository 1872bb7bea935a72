use crate::error::{Result, TrackerError};
use crate::types::Document;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Whole-document JSON storage at a single path.
///
/// Every read parses the entire file and every write replaces it. Writes go
/// through a temp file in the same directory that is then renamed over the
/// target, so a crash mid-write leaves the previous content intact.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Creates a fresh empty document. Refuses to touch an existing file,
    /// including one that appears between the check and the write.
    pub fn initialize(&self) -> Result<Document> {
        if self.path.exists() {
            return Err(TrackerError::AlreadyExists(self.path.clone()));
        }
        if let Some(dir) = self.parent_dir() {
            fs::create_dir_all(dir)?;
        }
        let doc = Document::new();
        let tmp = self.write_temp(&doc)?;
        tmp.persist_noclobber(&self.path).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                TrackerError::AlreadyExists(self.path.clone())
            } else {
                e.error.into()
            }
        })?;
        debug!(path = %self.path.display(), "initialized data file");
        Ok(doc)
    }

    pub fn load(&self) -> Result<Document> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TrackerError::StoreNotFound(self.path.clone()));
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(TrackerError::corrupt(&self.path, "file is not valid UTF-8"));
            }
            Err(e) => return Err(e.into()),
        };
        let doc =
            parse_document(&data).map_err(|reason| TrackerError::corrupt(&self.path, reason))?;
        debug!(
            path = %self.path.display(),
            projects = doc.projects.len(),
            active = doc.tracking.is_active(),
            "loaded data file"
        );
        Ok(doc)
    }

    pub fn save(&self, doc: &Document) -> Result<()> {
        let tmp = self.write_temp(doc)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), "saved data file");
        Ok(())
    }

    /// Serializes `doc` into a synced temp file next to the data file.
    fn write_temp(&self, doc: &Document) -> Result<NamedTempFile> {
        let dir = self
            .parent_dir()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, doc).map_err(io::Error::from)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }

    /// Takes an exclusive advisory lock on a sidecar `<file>.lock`.
    ///
    /// Blocks until any other holder releases it. The lock is dropped with
    /// the returned guard. Fails with `StoreNotFound` before creating the
    /// sidecar if the data file does not exist.
    pub fn lock(&self) -> Result<StoreLock> {
        if !self.exists() {
            return Err(TrackerError::StoreNotFound(self.path.clone()));
        }
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        debug!(path = %lock_path.display(), "acquired data file lock");
        Ok(StoreLock { file })
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// Guard for the lock taken by [`Store::lock`].
#[derive(Debug)]
pub struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn parse_document(data: &str) -> std::result::Result<Document, String> {
    let doc: Document = serde_json::from_str(data).map_err(|e| e.to_string())?;
    doc.validate()?;
    Ok(doc)
}
