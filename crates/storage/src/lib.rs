#![forbid(unsafe_code)]

pub mod repository;
pub mod samples;
pub mod sqlite;

pub use repository::{InMemoryRepository, SetRepository, Storage, StorageError};
