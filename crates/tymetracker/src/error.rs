use crate::types::ProjectId;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Data file {0} already exists")]
    AlreadyExists(PathBuf),

    #[error("Could not load data file {0}. Please run `tt init` first")]
    StoreNotFound(PathBuf),

    #[error("Read corrupt data from {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Project {0} not found")]
    ProjectNotFound(ProjectId),

    #[error("Already tracking project {0}; stop it first")]
    AlreadyActive(ProjectId),

    #[error("No active time tracking")]
    NotActive,

    #[error("Home directory not found")]
    NoHomeDirectory,
}

/// Coarse failure categories, one per distinct user-facing outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    Corrupt,
    Io,
    InvalidInput,
    AlreadyActive,
    NotActive,
}

impl TrackerError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::StoreNotFound(_) | Self::ProjectNotFound(_) => ErrorKind::NotFound,
            Self::Corrupt { .. } => ErrorKind::Corrupt,
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidInput(_) | Self::NoHomeDirectory => ErrorKind::InvalidInput,
            Self::AlreadyActive(_) => ErrorKind::AlreadyActive,
            Self::NotActive => ErrorKind::NotActive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_both_not_found_variants() {
        assert_eq!(
            TrackerError::StoreNotFound(PathBuf::from("/tmp/x")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            TrackerError::ProjectNotFound(ProjectId::new(3)).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            TrackerError::ProjectNotFound(ProjectId::new(99)).to_string(),
            "Project 99 not found"
        );
        assert_eq!(
            TrackerError::corrupt("/tmp/data.json", "expected value").to_string(),
            "Read corrupt data from /tmp/data.json: expected value"
        );
        assert_eq!(TrackerError::NotActive.to_string(), "No active time tracking");
    }

    #[test]
    fn test_io_from() {
        let err: TrackerError = std::io::Error::other("disk full").into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
