use super::KeyValueStore;
use crate::error::{CarlogError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DOC_EXT: &str = "json";

/// Filesystem backend: one `<key>.json` document per key inside `root`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document backing `key`.
    pub fn doc_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CarlogError::persistence(key, "invalid store key"));
        }
        Ok(self.root.join(format!("{}.{}", key, DOC_EXT)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(CarlogError::Io)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FsBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.doc_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(CarlogError::Io)?;
        Ok(Some(text))
    }

    fn write(&self, key: &str, text: &str) -> Result<()> {
        let target = self.doc_path(key)?;
        self.ensure_dir()?;

        // Atomic Write
        let tmp = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        discard_on_error(&tmp, fs::write(&tmp, text))?;
        discard_on_error(&tmp, fs::rename(&tmp, &target))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.doc_path(key)?;
        if path.exists() {
            fs::remove_file(path).map_err(CarlogError::Io)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if !self.root.exists() {
            return Ok(());
        }
        let entries = fs::read_dir(&self.root).map_err(CarlogError::Io)?;
        for entry in entries {
            let path = entry.map_err(CarlogError::Io)?.path();
            let is_doc =
                path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(DOC_EXT);
            if is_doc {
                fs::remove_file(&path).map_err(CarlogError::Io)?;
            }
        }
        Ok(())
    }
}

/// Drop the temp file of a failed write before reporting the error.
fn discard_on_error<T>(tmp: &Path, result: io::Result<T>) -> Result<T> {
    result.map_err(|e| {
        let _ = fs::remove_file(tmp);
        CarlogError::Io(e)
    })
}
