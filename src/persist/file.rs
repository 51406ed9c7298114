//! File-backed state store: one JSON document per key under a state
//! directory.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::StateStore;
use crate::error::NavigationError;

/// Durable store writing each key to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Store rooted at an explicit directory, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory for `product`.
    pub fn default_location(product: &str) -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(product);
        Self::new(dir)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are engine-chosen; sanitize anyway so a session id can never
        // escape the state directory.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, NavigationError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(NavigationError::corrupt(key, err.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), NavigationError> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| NavigationError::transient(err.to_string()))?;
        fs::write(self.path_for(key), value)
            .map_err(|err| NavigationError::transient(err.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), NavigationError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(NavigationError::transient(err.to_string())),
        }
    }
}
