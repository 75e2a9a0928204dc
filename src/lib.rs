//! # people-store
//!
//! An embedded record store for people.
//!
//! Records live in an in-memory collection guarded by a single lock and are
//! mirrored to a pretty-printed JSON file after every mutation. On top of the
//! store sits a result-producing repository and a controller that implements
//! optimistic removal with a single-slot undo buffer.
//!
//! ## Layers
//!
//! - **Store** ([`storage::JsonFileStore`]): authoritative collection + file
//! - **Repository** ([`services::PersonRepository`]): error boundary over the store
//! - **Controller** ([`services::PeopleController`]): visible list, undo slot, background persistence
//!
//! ## Example
//!
//! ```rust,ignore
//! use people_store::config::StoreConfig;
//! use people_store::services::PersonRepository;
//! use people_store::storage::{JsonFileStore, Seed};
//!
//! let store = JsonFileStore::new(StoreConfig::default(), Seed)?;
//! let repository = PersonRepository::new(store);
//! repository.initialize()?;
//!
//! let people = repository.get_all_sorted_by(|p| Some(p.first_name.as_str()))?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::{PeopleStoreConfig, StoreConfig};
pub use models::{EventMeta, Person, PersonEvent};
pub use services::{PeopleController, PeopleState, PersonRepository, UndoSlot};
pub use storage::{DataStore, JsonFileStore, Seed, SeedProvider};

/// Error type for people-store operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotFound` | `update`/`delete` reference an id the store does not hold |
/// | `IoFailure` | File read/write/parse fails, directory creation fails, the store lock is poisoned |
/// | `InvalidInput` | A configuration file or value cannot be interpreted |
///
/// Inserting a record whose id is already present is not an error; the
/// store ignores it.
#[derive(Debug, ThisError)]
pub enum Error {
    /// No record with the given id exists.
    #[error("person with id '{id}' does not exist")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A filesystem, serialization, or locking operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    IoFailure {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Builds an [`Error::IoFailure`] from an operation name and any displayable cause.
    pub fn io(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::IoFailure {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Returns `true` for the expected, recoverable "no such record" case.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::IoFailure { .. } => "io_failure",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

/// Result type alias for people-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
