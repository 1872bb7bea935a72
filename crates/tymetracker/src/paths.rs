use crate::error::{Result, TrackerError};
use std::env;
use std::path::{Path, PathBuf};

/// File name of the data file when no explicit location is configured.
pub const DEFAULT_FILE_NAME: &str = ".tymetracker.json";

/// Environment variable that overrides the data file location.
pub const DATA_FILE_ENV: &str = "TT_DATA_FILE";

/// Resolves where the data file lives.
///
/// An explicit file wins; otherwise the default file name is placed in the
/// home directory. Explicit paths starting with `~/` are expanded.
#[derive(Debug, Clone)]
pub struct PathResolver {
    home_dir: Option<PathBuf>,
    data_file: Option<PathBuf>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver {
    pub fn new() -> Self {
        Self {
            home_dir: dirs::home_dir(),
            data_file: None,
        }
    }

    pub fn with_home<P: Into<PathBuf>>(mut self, home: P) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    pub fn with_data_file<P: Into<PathBuf>>(mut self, data_file: P) -> Self {
        self.data_file = Some(data_file.into());
        self
    }

    pub fn home_dir(&self) -> Result<&Path> {
        self.home_dir
            .as_deref()
            .ok_or(TrackerError::NoHomeDirectory)
    }

    pub fn data_file(&self) -> Result<PathBuf> {
        match self.data_file {
            Some(ref explicit) => self.expand_tilde(explicit),
            None => Ok(self.home_dir()?.join(DEFAULT_FILE_NAME)),
        }
    }

    fn expand_tilde(&self, path: &Path) -> Result<PathBuf> {
        match path.strip_prefix("~") {
            Ok(rest) => Ok(self.home_dir()?.join(rest)),
            Err(_) => Ok(path.to_path_buf()),
        }
    }
}

mod dirs {
    use super::*;

    pub fn home_dir() -> Option<PathBuf> {
        env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_location_in_home() {
        let resolver = PathResolver::new().with_home("/home/alex");
        assert_eq!(
            resolver.data_file().unwrap(),
            PathBuf::from("/home/alex/.tymetracker.json")
        );
    }

    #[test]
    fn test_explicit_file_wins() {
        let resolver = PathResolver::new()
            .with_home("/home/alex")
            .with_data_file("/srv/tt/data.json");
        assert_eq!(
            resolver.data_file().unwrap(),
            PathBuf::from("/srv/tt/data.json")
        );
    }

    #[test]
    fn test_explicit_file_tilde_expansion() {
        let resolver = PathResolver::new()
            .with_home("/home/alex")
            .with_data_file("~/work/tt.json");
        assert_eq!(
            resolver.data_file().unwrap(),
            PathBuf::from("/home/alex/work/tt.json")
        );
    }

    #[test]
    fn test_tilde_inside_name_is_literal() {
        let resolver = PathResolver::new()
            .with_home("/home/alex")
            .with_data_file("~backup.json");
        assert_eq!(
            resolver.data_file().unwrap(),
            PathBuf::from("~backup.json")
        );
    }

    #[test]
    fn test_no_home_directory() {
        let resolver = PathResolver {
            home_dir: None,
            data_file: None,
        };
        assert!(matches!(
            resolver.data_file(),
            Err(TrackerError::NoHomeDirectory)
        ));
    }

    #[test]
    fn test_default_with_explicit_file_ignores_home() {
        let resolver = PathResolver::default().with_data_file("/srv/tt/data.json");
        assert_eq!(
            resolver.data_file().unwrap(),
            PathBuf::from("/srv/tt/data.json")
        );
    }
}
