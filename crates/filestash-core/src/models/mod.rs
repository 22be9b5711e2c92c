//! Domain models

pub mod event;
pub mod file;

pub use event::{InstanceDeletedEvent, InstanceFlowHeaders};
pub use file::{DeletedFile, File, FileId};
