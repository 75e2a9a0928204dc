//! Data store trait.

use crate::models::Person;
use crate::Result;
use std::path::Path;

/// Contract for the authoritative person collection.
///
/// Every operation is mutually exclusive with every other operation on the
/// same instance, so callers on different threads observe a strictly serial
/// history. Reads return snapshots; no reference into the collection escapes.
///
/// Iteration order is insertion order: records read from the file keep file
/// order, `insert` appends, and `update` moves the replacement to the end.
pub trait DataStore: Send + Sync {
    /// Path of the backing file.
    fn file_path(&self) -> &Path;

    /// Loads the collection, seeding the file first if it is absent or empty.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the directory cannot be created or the file
    /// cannot be read, parsed, or written.
    fn initialize(&self) -> Result<()>;

    /// Returns a copy of all records in iteration order.
    fn select_all(&self) -> Result<Vec<Person>>;

    /// Returns all records sorted ascending by `key`, ignoring case.
    ///
    /// Records whose key is `None` sort after every record with a key. The
    /// sort is stable.
    fn select_all_sorted_by<F>(&self, key: F) -> Result<Vec<Person>>
    where
        F: Fn(&Person) -> Option<&str>;

    /// Returns the records matching `predicate`, in iteration order.
    fn select_where<P>(&self, predicate: P) -> Result<Vec<Person>>
    where
        P: Fn(&Person) -> bool;

    /// Returns the record with the given id.
    fn find_by_id(&self, id: &str) -> Result<Option<Person>>;

    /// Returns the first record, in iteration order, matching `predicate`.
    fn find_by<P>(&self, predicate: P) -> Result<Option<Person>>
    where
        P: Fn(&Person) -> bool;

    /// Adds a record and rewrites the file.
    ///
    /// A record whose id is already present is ignored; this is not an error.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the file cannot be written.
    fn insert(&self, person: Person) -> Result<()>;

    /// Replaces the record with the same id and rewrites the file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id, `IoFailure` if the file
    /// cannot be written.
    fn update(&self, person: Person) -> Result<()>;

    /// Removes the record with the same id and rewrites the file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id, `IoFailure` if the file
    /// cannot be written.
    fn delete(&self, person: &Person) -> Result<()>;

    /// Returns the number of records.
    fn len(&self) -> Result<usize> {
        Ok(self.select_all()?.len())
    }

    /// Returns `true` if the store holds no records.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
