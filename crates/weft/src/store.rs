//! Durable key to blob storage for cache artifacts.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// A durable key to blob store.
///
/// Keys are flat file names. Writes must be atomic: a reader sees either the
/// previous blob or the new one, never a partial write.
pub trait DiskStore: Send + Sync {
    /// Location of `key`, for diagnostics.
    fn path(&self, key: &str) -> PathBuf;

    fn exists(&self, key: &str) -> bool;

    fn read(&self, key: &str) -> io::Result<Vec<u8>>;

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Stores each key as a file inside one directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DiskStore for FileStore {
    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn exists(&self, key: &str) -> bool {
        self.path(key).is_file()
    }

    fn read(&self, key: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.path(key))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let mut file = NamedTempFile::new_in(&self.root)?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;
        file.persist(self.path(key)).map_err(|err| err.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
