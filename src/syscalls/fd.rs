/*!
 * File Descriptor Table
 * Maps small integer ids to open-file handles
 *
 * Ids are slot indices; `open` takes the lowest free slot, so the first
 * open of an execution returns id 0. The error id (`FD_ERROR`) is
 * negative and never names a slot.
 */

use crate::core::types::FileId;
use crate::vfs::{FileSystem, OpenFile, VfsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum FdError {
    #[error("file id {0} is not open")]
    NotOpen(FileId),

    #[error("descriptor table full ({capacity} open files)")]
    TableFull { capacity: usize },

    #[error(transparent)]
    Vfs(#[from] VfsError),
}

/// Fixed-capacity descriptor table owned by one kernel instance
pub struct FdTable {
    slots: Vec<Option<Box<dyn OpenFile>>>,
}

impl FdTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    /// Open `name` and install it in the lowest free slot
    ///
    /// The table is left unchanged on any failure.
    pub fn open(&mut self, fs: &dyn FileSystem, name: &str) -> Result<FileId, FdError> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(FdError::TableFull {
                capacity: self.capacity(),
            })?;
        let file = fs.open(name)?;
        self.slots[index] = Some(file);

        let id = index as FileId;
        debug!(id, name, fs = fs.name(), "File opened");
        Ok(id)
    }

    /// Release the handle behind `id` and empty its slot
    pub fn close(&mut self, id: FileId) -> Result<(), FdError> {
        let file = self
            .slot_mut(id)
            .and_then(Option::take)
            .ok_or(FdError::NotOpen(id))?;
        debug!(id, name = file.name(), "File closed");
        Ok(())
    }

    /// Read up to `max` bytes from the file behind `id`
    pub fn read(&mut self, id: FileId, max: usize) -> Result<Vec<u8>, FdError> {
        let file = self
            .slot_mut(id)
            .and_then(Option::as_mut)
            .ok_or(FdError::NotOpen(id))?;
        Ok(file.read_up_to(max)?)
    }

    pub fn is_open(&self, id: FileId) -> bool {
        self.index(id)
            .and_then(|i| self.slots[i].as_ref())
            .is_some()
    }

    /// Name the handle behind `id` was opened with
    pub fn name_of(&self, id: FileId) -> Option<&str> {
        self.index(id)
            .and_then(|i| self.slots[i].as_deref())
            .map(|f| f.name())
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of open handles
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every handle
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    fn index(&self, id: FileId) -> Option<usize> {
        usize::try_from(id).ok().filter(|&i| i < self.slots.len())
    }

    fn slot_mut(&mut self, id: FileId) -> Option<&mut Option<Box<dyn OpenFile>>> {
        let index = self.index(id)?;
        self.slots.get_mut(index)
    }
}

impl fmt::Debug for FdTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.slots
                    .iter()
                    .enumerate()
                    .filter_map(|(i, s)| s.as_ref().map(|file| (i, file.name()))),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemFS;

    fn fs() -> MemFS {
        let fs = MemFS::new();
        fs.insert("a.txt", "alpha");
        fs.insert("b.txt", "bravo");
        fs
    }

    #[test]
    fn test_open_read_close() {
        let fs = fs();
        let mut table = FdTable::with_capacity(1);

        let id = table.open(&fs, "a.txt").unwrap();
        assert_eq!(id, 0);
        assert!(table.is_open(id));
        assert_eq!(table.name_of(id), Some("a.txt"));
        assert_eq!(table.read(id, 3).unwrap(), b"alp");
        assert_eq!(table.read(id, 10).unwrap(), b"ha");

        table.close(id).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.read(id, 1), Err(FdError::NotOpen(0)));
    }

    #[test]
    fn test_close_never_opened() {
        let mut table = FdTable::with_capacity(2);
        assert_eq!(table.close(0), Err(FdError::NotOpen(0)));
        assert_eq!(table.close(-1), Err(FdError::NotOpen(-1)));
        assert_eq!(table.close(7), Err(FdError::NotOpen(7)));
    }

    #[test]
    fn test_open_missing_leaves_table_unchanged() {
        let fs = fs();
        let mut table = FdTable::with_capacity(1);
        assert!(matches!(
            table.open(&fs, "missing.txt"),
            Err(FdError::Vfs(VfsError::NotFound(_)))
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_capacity_limit_and_reuse() {
        let fs = fs();
        let mut table = FdTable::with_capacity(2);

        assert_eq!(table.open(&fs, "a.txt").unwrap(), 0);
        assert_eq!(table.open(&fs, "b.txt").unwrap(), 1);
        assert_eq!(
            table.open(&fs, "a.txt"),
            Err(FdError::TableFull { capacity: 2 })
        );

        table.close(0).unwrap();
        assert_eq!(table.open(&fs, "b.txt").unwrap(), 0);
        assert_eq!(table.len(), 2);

        table.clear();
        assert!(table.is_empty());
    }
}
