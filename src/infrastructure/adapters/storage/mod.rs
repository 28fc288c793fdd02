//! Storage Adapters
//!
//! 作业文件的文件系统存储

mod file_storage;

pub use file_storage::FileJobStorage;
