/*!
 * Virtual File System Module
 * File-system collaborator consumed by Open/Read/Close
 */

pub mod errors;
pub mod local;
pub mod memory;
pub mod traits;

// Re-exports
pub use errors::{VfsError, VfsResult};
pub use local::LocalFS;
pub use memory::MemFS;
pub use traits::{FileSystem, OpenFile};
