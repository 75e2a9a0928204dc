//! Person repository.
//!
//! The error boundary between the store and everything above it. Every call
//! is forwarded 1:1; failures come back as `Err` values carrying the error
//! kind and message, and are logged and counted here. No validation,
//! locking, or caching is added.

use crate::models::Person;
use crate::storage::DataStore;
use crate::{Error, Result};
use tracing::instrument;

/// Result-producing façade over a [`DataStore`].
pub struct PersonRepository<S> {
    store: S,
}

impl<S: DataStore> PersonRepository<S> {
    /// Creates a repository over the given store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Loads (and if necessary seeds) the store.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the store file cannot be prepared or read.
    #[instrument(skip(self))]
    pub fn initialize(&self) -> Result<()> {
        observe("initialize", self.store.initialize())
    }

    /// Returns all people in store order.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the store is unusable.
    pub fn get_all(&self) -> Result<Vec<Person>> {
        observe("get_all", self.store.select_all())
    }

    /// Returns all people sorted case-insensitively by `key`.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the store is unusable.
    pub fn get_all_sorted_by<F>(&self, key: F) -> Result<Vec<Person>>
    where
        F: Fn(&Person) -> Option<&str>,
    {
        observe("get_all_sorted_by", self.store.select_all_sorted_by(key))
    }

    /// Returns the people matching `predicate`.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the store is unusable.
    pub fn get_where<P>(&self, predicate: P) -> Result<Vec<Person>>
    where
        P: Fn(&Person) -> bool,
    {
        observe("get_where", self.store.select_where(predicate))
    }

    /// Looks a person up by id.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the store is unusable.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Person>> {
        observe("find_by_id", self.store.find_by_id(id))
    }

    /// Returns the first person matching `predicate`.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the store is unusable.
    pub fn find_by<P>(&self, predicate: P) -> Result<Option<Person>>
    where
        P: Fn(&Person) -> bool,
    {
        observe("find_by", self.store.find_by(predicate))
    }

    /// Inserts a person; an already-present id is silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the store file cannot be written.
    #[instrument(skip(self, person), fields(id = %person.id))]
    pub fn create(&self, person: Person) -> Result<()> {
        observe("create", self.store.insert(person))
    }

    /// Replaces the person with the same id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `IoFailure` on write failure.
    #[instrument(skip(self, person), fields(id = %person.id))]
    pub fn update(&self, person: Person) -> Result<()> {
        observe("update", self.store.update(person))
    }

    /// Removes the person with the same id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `IoFailure` on write failure.
    #[instrument(skip(self, person), fields(id = %person.id))]
    pub fn remove(&self, person: &Person) -> Result<()> {
        observe("remove", self.store.delete(person))
    }
}

/// Logs and counts a failed store call, passing the result through.
fn observe<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        metrics::counter!(
            "repository_failures_total",
            "operation" => operation,
            "kind" => e.kind()
        )
        .increment(1);
        match e {
            Error::NotFound { .. } => tracing::debug!(operation, error = %e, "Repository miss"),
            _ => tracing::warn!(operation, error = %e, "Repository operation failed"),
        }
    }
    result
}
