//! Filestash Services Library
//!
//! The file-handling core: the write-through cache, the repository that
//! translates files to blobs, the orchestrating `FileService`, the scheduled
//! retention sweep and the instance-deleted event handler.

pub mod cache;
pub mod file_service;
pub mod lifecycle;
mod metadata;
pub mod repository;
pub mod retention;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use cache::{CacheError, FileCache, LruFileCache};
pub use file_service::FileService;
pub use lifecycle::{InstanceDeletedHandler, INSTANCE_DELETED_EVENT};
pub use repository::FileRepository;
pub use retention::RetentionService;
