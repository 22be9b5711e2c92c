//! Filestash Storage Library
//!
//! This crate provides the durable blob store abstraction and its backends.
//! It includes the `BlobStore` trait, an `object_store` backed implementation
//! (S3, Azure Blob Storage, in-memory) and a local filesystem implementation.
//!
//! # Key format
//!
//! Every file is stored under a flat key equal to its id rendered as a
//! hyphenated UUID string. Keys never contain path separators.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-object")]
pub mod object;
pub mod traits;

// Re-export commonly used types
pub use factory::create_blob_store;
pub use filestash_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStore;
#[cfg(feature = "storage-object")]
pub use object::ObjectStoreBlobStore;
pub use traits::{
    BlobListing, BlobPayload, BlobProperties, BlobStore, StorageError, StorageResult, StoredBlob,
};
