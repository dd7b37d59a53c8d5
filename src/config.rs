use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::library::{BookSource, DirSource, HttpSource};

pub const LIBRARY_ENV: &str = "BOOKPANE_LIBRARY";
pub const DATA_DIR_ENV: &str = "BOOKPANE_DATA_DIR";
pub const LOG_ENV: &str = "BOOKPANE_LOG";

pub const DEFAULT_LIBRARY: &str = "books";
pub const LOG_FILE: &str = "bookpane.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Library {
    Dir(PathBuf),
    Http(String),
}

impl Library {
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Library::Http(value.to_string())
        } else {
            Library::Dir(PathBuf::from(value))
        }
    }

    pub fn source(&self) -> Result<Box<dyn BookSource>> {
        Ok(match self {
            Library::Dir(root) => Box::new(DirSource::new(root)),
            Library::Http(base) => Box::new(HttpSource::new(base)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub library: Library,
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    /// Resolve each setting from, in order of priority:
    /// 1. The explicit command-line value
    /// 2. The matching `BOOKPANE_*` environment variable
    /// 3. A default (`./books`, the XDG data home, a log file in the data dir)
    pub fn resolve(
        library: Option<&str>,
        data_dir: Option<&Path>,
        log_file: Option<&Path>,
    ) -> Result<Self> {
        let library = match library {
            Some(value) => Library::parse(value),
            None => Library::parse(&env_value(LIBRARY_ENV).unwrap_or_else(|| DEFAULT_LIBRARY.into())),
        };

        let data_dir = resolve_data_dir(data_dir, env_value(DATA_DIR_ENV))?;
        std::fs::create_dir_all(&data_dir).map_err(|source| Error::DataDir {
            path: data_dir.clone(),
            source,
        })?;

        let log_file = match log_file {
            Some(path) => path.to_path_buf(),
            None => env_value(LOG_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(LOG_FILE)),
        };

        Ok(Self {
            library,
            data_dir,
            log_file,
        })
    }
}

/// An unset or empty variable both mean "use the default".
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn resolve_data_dir(explicit: Option<&Path>, env: Option<String>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(val) = env.filter(|val| !val.is_empty()) {
        return Ok(PathBuf::from(val));
    }
    xdg::BaseDirectories::with_prefix("bookpane")
        .get_data_home()
        .ok_or_else(|| Error::Config("could not determine XDG data home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_select_the_http_library() {
        assert_eq!(
            Library::parse("https://example.org/books"),
            Library::Http("https://example.org/books".into())
        );
        assert_eq!(Library::parse("books"), Library::Dir(PathBuf::from("books")));
    }

    #[test]
    fn empty_data_dir_variable_falls_back_to_xdg() {
        let from_env = resolve_data_dir(None, Some("/srv/bookpane".into())).unwrap();
        assert_eq!(from_env, PathBuf::from("/srv/bookpane"));

        let Ok(fallback) = resolve_data_dir(None, Some(String::new())) else {
            // No XDG data home in this environment; still must not be "".
            return;
        };
        assert_ne!(fallback, PathBuf::new());
        assert!(fallback.ends_with("bookpane"), "{}", fallback.display());
    }

    #[test]
    fn data_dir_errors_keep_the_io_cause() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let err = Config::resolve(Some("books"), Some(&file.join("sub")), None).unwrap_err();
        assert!(matches!(err, Error::DataDir { .. }), "{err}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn explicit_values_win() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("data");
        let log = tmp.path().join("x.log");
        let config = Config::resolve(Some("/srv/books"), Some(&data), Some(&log)).unwrap();

        assert_eq!(config.library, Library::Dir(PathBuf::from("/srv/books")));
        assert_eq!(config.data_dir, data);
        assert!(data.is_dir());
        assert_eq!(config.log_file, log);
    }
}
