//! File-backed list storage
//!
//! Each list lives in `<dir>/<name>.txt`, one entry per line.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use calcpad_core::services::{ListStore, StoreError, join_lines, parse_lines};
use log::debug;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CALCPAD_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "calcpad-data";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `$CALCPAD_DATA_DIR`, or `./calcpad-data`.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", name))
    }
}

fn io_error(err: std::io::Error) -> StoreError {
    StoreError::Io(err.to_string())
}

impl ListStore for FileStore {
    fn load_list(&mut self, name: &str) -> Result<Vec<String>, StoreError> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(parse_lines(&contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(err) => Err(io_error(err)),
        }
    }

    fn save_list(&mut self, name: &str, items: &[String]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(io_error)?;

        // Write then rename so a crash never leaves a half-written list
        let path = self.path(name);
        let staging = path.with_extension("txt.tmp");
        fs::write(&staging, join_lines(items)).map_err(io_error)?;
        fs::rename(&staging, &path).map_err(io_error)?;

        debug!("Saved {} entries to {}", items.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "calcpad-store-{}-{}",
            std::process::id(),
            test
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_list_is_not_found() {
        let mut store = FileStore::new(scratch_dir("missing"));
        assert_eq!(
            store.load_list("history"),
            Err(StoreError::NotFound("history".to_string()))
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("save");
        let mut store = FileStore::new(&dir);
        let items = vec!["1+1 = 2".to_string(), "2*3 = 6".to_string()];

        store.save_list("history", &items).unwrap();
        assert_eq!(
            fs::read_to_string(dir.join("history.txt")).unwrap(),
            "1+1 = 2\n2*3 = 6\n"
        );
        assert_eq!(store.load_list("history").unwrap(), items);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let dir = scratch_dir("blank");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("history.txt"), "\n1+1 = 2\n\n  \n").unwrap();

        let mut store = FileStore::new(&dir);
        assert_eq!(store.load_list("history").unwrap(), vec!["1+1 = 2".to_string()]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
