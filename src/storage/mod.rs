//! Storage layer.
//!
//! - [`DataStore`]: the store contract (CRUD + query primitives, all serialized)
//! - [`JsonFileStore`]: in-memory collection mirrored to a JSON file
//! - [`SeedProvider`]: fixture records for first-run population

// The store lock is held across file I/O.
#![allow(clippy::significant_drop_tightening)]

pub mod persistence;
pub mod seed;
pub mod traits;

pub use persistence::{JsonFileStore, sort_case_insensitive};
pub use seed::{Seed, SeedProvider};
pub use traits::DataStore;
