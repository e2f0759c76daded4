/*!
 * Local Filesystem Backend
 * Wraps std::fs for host filesystem access under a fixed root
 */

use path_clean::PathClean;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use super::errors::{VfsError, VfsResult};
use super::traits::{FileSystem, OpenFile};

/// Local filesystem implementation using std::fs
///
/// File names coming from user programs are resolved relative to `root`
/// and can never escape it.
#[derive(Debug, Clone)]
pub struct LocalFS {
    root: PathBuf,
}

impl LocalFS {
    /// Create new local filesystem rooted at specified path
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a user-supplied name relative to root
    fn resolve(&self, name: &str) -> VfsResult<PathBuf> {
        if name.is_empty() || name.contains('\0') {
            return Err(VfsError::InvalidPath(format!("{:?}", name)));
        }

        // Lexically normalize as if rooted at "/", so ".." stops at the root
        let cleaned = Path::new("/").join(name).clean();
        let relative: PathBuf = cleaned
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();

        if relative.as_os_str().is_empty() {
            return Err(VfsError::InvalidPath(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl FileSystem for LocalFS {
    fn open(&self, name: &str) -> VfsResult<Box<dyn OpenFile>> {
        let path = self.resolve(name)?;
        if path.is_dir() {
            return Err(VfsError::IsADirectory(name.to_string()));
        }
        let file = File::open(&path).map_err(|e| VfsError::from_io(e, name))?;
        Ok(Box::new(LocalFile {
            name: name.to_string(),
            file,
        }))
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn name(&self) -> &str {
        "localfs"
    }
}

/// Host file handle
struct LocalFile {
    name: String,
    file: File,
}

impl Read for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl OpenFile for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }
}
