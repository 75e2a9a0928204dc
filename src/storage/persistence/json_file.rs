//! JSON file backed store.
//!
//! Keeps the whole collection in memory behind one mutex and rewrites the
//! complete file after every mutation, before the mutating call returns.
//!
//! # Write protocol
//!
//! 1. Serialize the collection as pretty-printed JSON
//! 2. Create the parent directory if needed
//! 3. Write `<file_name>.tmp` next to the target and sync it
//! 4. Rename the temp file over the target
//!
//! If the rename fails the temp file is copied over the target and then
//! removed. Readers of the target path never see a half-written temp file.
//! A failed write rolls the in-memory collection back, so a failed mutation
//! leaves memory and file as they were.

use crate::config::StoreConfig;
use crate::models::Person;
use crate::storage::seed::SeedProvider;
use crate::storage::traits::DataStore;
use crate::{Error, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// File-backed person store.
pub struct JsonFileStore<S> {
    /// Location and diagnostics settings.
    config: StoreConfig,
    /// Resolved path of the store file.
    file_path: PathBuf,
    /// Fixture source for first-run population.
    seed: S,
    /// The authoritative collection, in insertion order.
    people: Mutex<Vec<Person>>,
}

impl<S: SeedProvider> JsonFileStore<S> {
    /// Creates a store for `<app_home>/Documents/<directory_name>/<file_name>`.
    ///
    /// The directory is created if it does not exist. No file is read until
    /// [`DataStore::initialize`] is called.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the directory cannot be created.
    pub fn new(config: StoreConfig, seed: S) -> Result<Self> {
        let file_path = config.file_path();
        ensure_parent_dir(&file_path)?;

        tracing::debug!(path = %file_path.display(), "Opened people store");

        Ok(Self {
            config,
            file_path,
            seed,
            people: Mutex::new(Vec::new()),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Person>>> {
        self.people.lock().map_err(|e| Error::io("lock_store", e))
    }

    /// Size of the store file, 0 when it does not exist.
    fn file_len(&self) -> Result<u64> {
        match fs::metadata(&self.file_path) {
            Ok(metadata) => Ok(metadata.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(Error::io("read_file_metadata", e)),
        }
    }

    /// Reads and decodes the whole file. Called with the lock held.
    fn read_file(&self) -> Result<Vec<Person>> {
        let json = fs::read_to_string(&self.file_path).map_err(|e| {
            tracing::error!(path = %self.file_path.display(), error = %e, "Failed to read store file");
            Error::io("read_store_file", e)
        })?;

        if json.trim().is_empty() {
            tracing::debug!("Store file is blank, loaded 0 people");
            return Ok(Vec::new());
        }
        if self.config.trace_payloads {
            tracing::trace!(payload = %json, "read");
        }

        let people: Vec<Person> = serde_json::from_str(&json).map_err(|e| {
            tracing::error!(path = %self.file_path.display(), error = %e, "Failed to decode store file");
            Error::io("deserialize_people", e)
        })?;

        let people = dedup_by_id(people);
        tracing::debug!(count = people.len(), "Decoded store file");
        Ok(people)
    }

    /// Writes the full collection using temp file + rename. Called with the lock held.
    fn write_file(&self, people: &[Person]) -> Result<()> {
        let json = serde_json::to_string_pretty(people)
            .map_err(|e| Error::io("serialize_people", e))?;

        ensure_parent_dir(&self.file_path)?;

        let tmp_path = temp_path(&self.file_path);
        if let Err(e) = write_synced(&tmp_path, json.as_bytes()) {
            remove_temp(&tmp_path);
            metrics::counter!("store_write_failures_total").increment(1);
            tracing::error!(path = %tmp_path.display(), error = %e, "Failed to write temp file");
            return Err(Error::io("write_temp_file", e));
        }

        if let Err(rename_err) = fs::rename(&tmp_path, &self.file_path) {
            tracing::warn!(error = %rename_err, "Rename failed, falling back to copy");
            let copied = fs::copy(&tmp_path, &self.file_path);
            remove_temp(&tmp_path);
            if let Err(e) = copied {
                metrics::counter!("store_write_failures_total").increment(1);
                tracing::error!(path = %self.file_path.display(), error = %e, "Failed to replace store file");
                return Err(Error::io("replace_store_file", e));
            }
        }

        metrics::counter!("store_writes_total").increment(1);
        tracing::debug!(count = people.len(), "Wrote store file");
        if self.config.trace_payloads {
            tracing::trace!(payload = %json, "write");
        }
        Ok(())
    }
}

impl<S: SeedProvider> DataStore for JsonFileStore<S> {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn initialize(&self) -> Result<()> {
        let mut people = self.lock()?;
        people.clear();

        ensure_parent_dir(&self.file_path)?;

        if self.file_len()? == 0 {
            let seeded = dedup_by_id(self.seed.people());
            tracing::debug!(count = seeded.len(), "Seeding empty store");
            self.write_file(&seeded)?;
        }

        *people = self.read_file()?;
        tracing::info!(
            path = %self.file_path.display(),
            count = people.len(),
            "Initialized people store"
        );
        Ok(())
    }

    fn select_all(&self) -> Result<Vec<Person>> {
        Ok(self.lock()?.clone())
    }

    fn select_all_sorted_by<F>(&self, key: F) -> Result<Vec<Person>>
    where
        F: Fn(&Person) -> Option<&str>,
    {
        let mut people = self.lock()?.clone();
        sort_case_insensitive(&mut people, key);
        Ok(people)
    }

    fn select_where<P>(&self, predicate: P) -> Result<Vec<Person>>
    where
        P: Fn(&Person) -> bool,
    {
        Ok(self
            .lock()?
            .iter()
            .filter(|p| predicate(p))
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Person>> {
        Ok(self.lock()?.iter().find(|p| p.id == id).cloned())
    }

    fn find_by<P>(&self, predicate: P) -> Result<Option<Person>>
    where
        P: Fn(&Person) -> bool,
    {
        Ok(self.lock()?.iter().find(|p| predicate(p)).cloned())
    }

    fn insert(&self, person: Person) -> Result<()> {
        let mut people = self.lock()?;
        if people.iter().any(|p| p.id == person.id) {
            tracing::debug!(id = %person.id, "Insert ignored, id already present");
            return Ok(());
        }

        let id = person.id.clone();
        people.push(person);
        if let Err(e) = self.write_file(&people) {
            people.pop();
            return Err(e);
        }

        tracing::debug!(id = %id, "Inserted person");
        Ok(())
    }

    fn update(&self, person: Person) -> Result<()> {
        let mut people = self.lock()?;
        let Some(index) = people.iter().position(|p| p.id == person.id) else {
            return Err(Error::NotFound {
                id: person.id.to_string(),
            });
        };

        let id = person.id.clone();
        let previous = people.remove(index);
        people.push(person);
        if let Err(e) = self.write_file(&people) {
            people.pop();
            people.insert(index, previous);
            return Err(e);
        }

        tracing::debug!(id = %id, "Updated person");
        Ok(())
    }

    fn delete(&self, person: &Person) -> Result<()> {
        let mut people = self.lock()?;
        let Some(index) = people.iter().position(|p| p.id == person.id) else {
            return Err(Error::NotFound {
                id: person.id.to_string(),
            });
        };

        let removed = people.remove(index);
        if let Err(e) = self.write_file(&people) {
            people.insert(index, removed);
            return Err(e);
        }

        tracing::debug!(id = %person.id, "Deleted person");
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}

/// Sorts ascending by a textual key, ignoring case; `None` keys go last.
///
/// Stable: records with equal keys keep their relative order.
pub fn sort_case_insensitive<F>(people: &mut [Person], key: F)
where
    F: Fn(&Person) -> Option<&str>,
{
    people.sort_by_cached_key(|p| {
        let k = key(p).map(str::to_lowercase);
        (k.is_none(), k)
    });
}

/// Drops later records whose id was already seen.
fn dedup_by_id(people: Vec<Person>) -> Vec<Person> {
    let mut seen = HashSet::with_capacity(people.len());
    let before = people.len();
    let unique: Vec<Person> = people
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect();
    if unique.len() != before {
        tracing::warn!(dropped = before - unique.len(), "Dropped records with duplicate ids");
    }
    unique
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(parent).map_err(|e| {
        tracing::error!(path = %parent.display(), error = %e, "Failed to create store directory");
        Error::io("create_store_dir", e)
    })
}

/// `<dir>/<file_name>.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Best-effort temp cleanup; failures are only logged.
fn remove_temp(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp file");
        }
    }
}
