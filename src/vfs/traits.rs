/*!
 * VFS Traits
 * Open/read/close primitives the descriptor table relies on
 */

use super::errors::{VfsError, VfsResult};
use std::io::Read;

/// File system the kernel opens named resources through
pub trait FileSystem: Send + Sync {
    /// Open an existing file for reading
    fn open(&self, name: &str) -> VfsResult<Box<dyn OpenFile>>;

    /// Whether `name` names an existing file
    fn exists(&self, name: &str) -> bool;

    /// Get filesystem name/type
    fn name(&self) -> &str;
}

/// Open file handle
///
/// Reads advance an internal position. Dropping the handle closes it.
pub trait OpenFile: Read + Send {
    /// Name the handle was opened with
    fn name(&self) -> &str;

    /// Read up to `max` bytes; fewer are returned at end of file
    fn read_up_to(&mut self, max: usize) -> VfsResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(max.min(8 * 1024));
        let result = Read::take(&mut *self, max as u64).read_to_end(&mut buf);
        result.map_err(|e| VfsError::IoError(format!("{}: {}", self.name(), e)))?;
        Ok(buf)
    }
}
