//! Durable local mirror
//!
//! A synchronous key → JSON string store. Every mutation overwrites the whole
//! snapshot for its key; reads happen once at mount.

use crate::error::MirrorError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key → serialized snapshot store
pub trait LocalMirror: Send + Sync + Debug {
    /// Read the snapshot stored under `key`
    ///
    /// # Errors
    /// Returns `MirrorError::Io` if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, MirrorError>;

    /// Replace the snapshot stored under `key`
    ///
    /// # Errors
    /// Returns `MirrorError::Io` if the backing store cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), MirrorError>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileMirror {
    dir: PathBuf,
}

impl FileMirror {
    /// Open mirror rooted at `dir`, creating it if needed
    ///
    /// # Errors
    /// Returns `MirrorError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, MirrorError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| MirrorError::io_error(&dir, e))?;
        Ok(Self { dir })
    }

    /// Directory holding the mirror files
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalMirror for FileMirror {
    fn read(&self, key: &str) -> Result<Option<String>, MirrorError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MirrorError::io_error(path, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), MirrorError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| MirrorError::io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| MirrorError::io_error(&path, e))
    }
}

/// In-process mirror
#[derive(Debug, Default)]
pub struct MemoryMirror {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryMirror {
    /// Create empty mirror
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create mirror with a pre-seeded entry
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mirror = Self::new();
        mirror.entries.lock().insert(key.into(), value.into());
        mirror
    }

    /// Raw entry for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl LocalMirror for MemoryMirror {
    fn read(&self, key: &str) -> Result<Option<String>, MirrorError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), MirrorError> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
