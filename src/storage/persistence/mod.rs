//! Persistence backend implementations.

mod json_file;

pub use json_file::{JsonFileStore, sort_case_insensitive};
