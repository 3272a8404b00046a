//! Concrete storage implementation: one plain file per key under a root
//! directory, written atomically.

pub mod file_store;
