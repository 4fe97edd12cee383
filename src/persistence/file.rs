//! Native file-backed storage
//!
//! All keys live in a single JSON object. Writes go to a temp file first and
//! are renamed over the target so a crash never leaves a half-written file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::Storage;
use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every future write
        let mut values = self.read_all().unwrap_or_else(|e| {
            log::warn!("Replacing unreadable store {}: {}", self.path.display(), e);
            BTreeMap::new()
        });
        values.insert(key.to_string(), value.to_string());

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!(
            "greedy_snake_{}_{}_{}.json",
            name,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn test_missing_file_reads_as_absent() {
        let storage = FileStorage::new(temp_path("missing"));
        assert_eq!(storage.get("anything").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_persists_across_instances() {
        let path = temp_path("persist");
        let mut storage = FileStorage::new(&path);
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_is_error_on_read_and_replaced_on_write() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json at all").unwrap();
        let mut storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get("a"),
            Err(StorageError::Serialization(_))
        ));

        storage.set("a", "ok").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("ok"));
        let _ = fs::remove_file(path);
    }
}
