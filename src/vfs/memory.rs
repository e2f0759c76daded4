/*!
 * In-Memory Filesystem Backend
 * Fast, volatile filesystem for testing and scripted runs
 */

use dashmap::DashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

use super::errors::{VfsError, VfsResult};
use super::traits::{FileSystem, OpenFile};

/// In-memory filesystem implementation
///
/// Clones share storage. Open handles read a snapshot taken at open time.
#[derive(Debug, Clone, Default)]
pub struct MemFS {
    files: Arc<DashMap<String, Arc<[u8]>>>,
}

impl MemFS {
    /// Create new in-memory filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a file
    pub fn insert(&self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        let data: Vec<u8> = data.into();
        self.files.insert(name.into(), Arc::from(data));
    }

    /// Remove a file; open handles keep their snapshot
    pub fn remove(&self, name: &str) -> VfsResult<()> {
        self.files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| VfsError::NotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSystem for MemFS {
    fn open(&self, name: &str) -> VfsResult<Box<dyn OpenFile>> {
        if name.is_empty() {
            return Err(VfsError::InvalidPath("empty file name".into()));
        }
        let data = self
            .files
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| VfsError::NotFound(name.to_string()))?;

        Ok(Box::new(MemFile {
            name: name.to_string(),
            cursor: Cursor::new(data),
        }))
    }

    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn name(&self) -> &str {
        "memfs"
    }
}

/// In-memory file handle
struct MemFile {
    name: String,
    cursor: Cursor<Arc<[u8]>>,
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl OpenFile for MemFile {
    fn name(&self) -> &str {
        &self.name
    }
}
