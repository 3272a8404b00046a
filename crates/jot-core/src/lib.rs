//! Core abstractions for jot: domain entities and storage contracts.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod auth;
pub mod notes;
pub mod storage;
