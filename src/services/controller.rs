//! People controller: visible list, undo slot, and background persistence.
//!
//! Optimistic operations (`remove_optimistic`, `undo`) change the visible
//! list immediately and return; the matching repository call is queued for a
//! background worker. A failed background call is reported as a
//! [`PersonEvent::PersistenceFailed`] event and the optimistic change stays
//! in place, so the visible list can drift from the store until the next
//! [`PeopleController::fetch`].
//!
//! Background calls run one at a time in the order they were queued.

use crate::models::{EventMeta, PersistOperation, Person, PersonEvent, PersonId};
use crate::observability::EventBus;
use crate::services::repository::PersonRepository;
use crate::services::undo::{UndoRemoval, UndoSlot, optimistic_remove, optimistic_undo_remove};
use crate::storage::DataStore;
use crate::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};

const EVENT_SOURCE: &str = "people_controller";

/// What the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeopleState {
    /// The visible list.
    pub people: Vec<Person>,
    /// A reload from the store is in progress.
    pub is_loading: bool,
    /// Id of the record most recently restored by undo, until acknowledged.
    pub restored_person_id: Option<PersonId>,
}

struct Inner {
    state: PeopleState,
    slot: UndoSlot<Person>,
}

/// Repository call queued by an optimistic operation.
#[derive(Debug)]
enum BackgroundAction {
    Remove(Person),
    Create(Person),
}

impl BackgroundAction {
    const fn operation(&self) -> PersistOperation {
        match self {
            Self::Remove(_) => PersistOperation::Remove,
            Self::Create(_) => PersistOperation::Create,
        }
    }

    const fn person(&self) -> &Person {
        match self {
            Self::Remove(p) | Self::Create(p) => p,
        }
    }

    fn apply<S: DataStore>(&self, repository: &PersonRepository<S>) -> Result<()> {
        match self {
            Self::Remove(person) => repository.remove(person),
            Self::Create(person) => repository.create(person.clone()),
        }
    }
}

enum Job {
    Persist(BackgroundAction),
    Flush(oneshot::Sender<()>),
}

/// Coordinates the visible list with the store.
pub struct PeopleController<S> {
    repository: Arc<PersonRepository<S>>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<PeopleState>,
    events: EventBus,
    jobs: mpsc::UnboundedSender<Job>,
}

impl<S: DataStore + 'static> PeopleController<S> {
    /// Creates a controller whose background work runs on `runtime`.
    ///
    /// The visible list starts empty; call [`Self::fetch`] to load it.
    pub fn new(repository: Arc<PersonRepository<S>>, runtime: &Handle, events: EventBus) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        runtime.spawn(run_worker(Arc::clone(&repository), events.clone(), rx));

        let (state_tx, _state_rx) = watch::channel(PeopleState::default());

        Self {
            repository,
            inner: Mutex::new(Inner {
                state: PeopleState::default(),
                slot: UndoSlot::Empty,
            }),
            state_tx,
            events,
            jobs,
        }
    }

    /// Creates a controller on the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` when called outside a tokio runtime.
    pub fn on_current_runtime(repository: Arc<PersonRepository<S>>, events: EventBus) -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| Error::io("runtime_handle", e))?;
        Ok(Self::new(repository, &handle, events))
    }

    /// Returns the repository.
    #[must_use]
    pub fn repository(&self) -> &PersonRepository<S> {
        &self.repository
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> PeopleState {
        self.lock().state.clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PeopleState> {
        self.state_tx.subscribe()
    }

    /// Subscribes to controller events.
    #[must_use]
    pub fn events(&self) -> tokio::sync::broadcast::Receiver<PersonEvent> {
        self.events.subscribe()
    }

    /// Returns `true` if a removal can currently be undone.
    #[must_use]
    pub fn has_pending_undo(&self) -> bool {
        !self.lock().slot.is_empty()
    }

    /// Returns the removal that [`Self::undo`] would restore.
    #[must_use]
    pub fn pending_undo(&self) -> Option<(Person, usize)> {
        match &self.lock().slot {
            UndoSlot::Empty => None,
            UndoSlot::Holding {
                item,
                original_index,
            } => Some((item.clone(), *original_index)),
        }
    }

    /// Reloads the visible list from the store, sorted by first name.
    ///
    /// Publishes a loading state first, then the loaded list.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the list is left as it was.
    pub fn fetch(&self) -> Result<PeopleState> {
        tracing::debug!("fetch");
        self.modify(|state| state.is_loading = true);

        match self
            .repository
            .get_all_sorted_by(|p| Some(p.first_name.as_str()))
        {
            Ok(people) => Ok(self.modify(|state| {
                state.is_loading = false;
                state.people = people;
            })),
            Err(e) => {
                self.modify(|state| state.is_loading = false);
                self.report(PersistOperation::Fetch, None, &e);
                Err(e)
            },
        }
    }

    /// Loads a single record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id.
    pub fn fetch_by_id(&self, id: &str) -> Result<Person> {
        let result = self.repository.find_by_id(id).and_then(|found| {
            found.ok_or_else(|| Error::NotFound { id: id.to_string() })
        });
        if let Err(e) = &result {
            self.report(PersistOperation::FetchById, Some(PersonId::new(id)), e);
        }
        result
    }

    /// Persists a new record, then reloads the list.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the list is left as it was.
    pub fn create(&self, person: Person) -> Result<PeopleState> {
        let id = person.id.clone();
        self.persist_then_fetch(PersistOperation::Create, id, |repo| repo.create(person))
    }

    /// Persists a replacement record, then reloads the list.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id or the write error.
    pub fn update(&self, person: Person) -> Result<PeopleState> {
        let id = person.id.clone();
        self.persist_then_fetch(PersistOperation::Update, id, |repo| repo.update(person))
    }

    /// Deletes a record without undo, then reloads the list.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id or the write error.
    pub fn remove(&self, person: &Person) -> Result<PeopleState> {
        self.persist_then_fetch(PersistOperation::Remove, person.id.clone(), |repo| {
            repo.remove(person)
        })
    }

    /// Removes a record from the visible list now and deletes it in the background.
    ///
    /// The removed record and its index replace whatever the undo slot held;
    /// an earlier removal can no longer be undone. If no visible record has
    /// this id nothing changes and nothing is queued.
    pub fn remove_optimistic(&self, person: &Person) -> PeopleState {
        tracing::debug!(id = %person.id, "remove_optimistic");

        let (state, removed, original_index) = {
            let mut inner = self.lock();
            let Some((people, slot)) = optimistic_remove(&inner.state.people, person, person_id)
            else {
                tracing::debug!(id = %person.id, "Not in visible list, nothing removed");
                return inner.state.clone();
            };
            let UndoSlot::Holding {
                item,
                original_index,
            } = &slot
            else {
                return inner.state.clone();
            };
            let removed = item.clone();
            let original_index = *original_index;

            if let Some(superseded) = inner.slot.item() {
                tracing::debug!(id = %superseded.id, "Undo slot overwritten");
            }
            inner.slot = slot;
            inner.state.people = people;
            self.state_tx.send_replace(inner.state.clone());
            (inner.state.clone(), removed, original_index)
        };

        self.events.publish(PersonEvent::Removed {
            meta: EventMeta::new(EVENT_SOURCE),
            person_id: removed.id.clone(),
            original_index,
        });
        self.enqueue(BackgroundAction::Remove(removed));
        state
    }

    /// Restores the most recent optimistic removal.
    ///
    /// The record is reinserted at its original index (clamped to the list
    /// length), `restored_person_id` is set, and the record is recreated in
    /// the background. With nothing to undo this is a no-op.
    pub fn undo(&self) -> PeopleState {
        tracing::debug!("undo");

        let (state, restored, index) = {
            let mut inner = self.lock();
            let slot = std::mem::take(&mut inner.slot);
            match optimistic_undo_remove(&inner.state.people, person_id, slot) {
                UndoRemoval::Nothing => return inner.state.clone(),
                UndoRemoval::AlreadyPresent => {
                    tracing::debug!("Held record already visible, undo slot cleared");
                    return inner.state.clone();
                },
                UndoRemoval::Restored { list, item, index } => {
                    inner.state.people = list;
                    inner.state.restored_person_id = Some(item.id.clone());
                    self.state_tx.send_replace(inner.state.clone());
                    (inner.state.clone(), item, index)
                },
            }
        };

        self.events.publish(PersonEvent::Restored {
            meta: EventMeta::new(EVENT_SOURCE),
            person_id: restored.id.clone(),
            index,
        });
        self.enqueue(BackgroundAction::Create(restored));
        state
    }

    /// Clears `restored_person_id`. Idempotent; the list and undo slot are untouched.
    pub fn acknowledge_restored(&self) -> PeopleState {
        let mut inner = self.lock();
        if inner.state.restored_person_id.take().is_some() {
            tracing::debug!("Restoration acknowledged");
            self.state_tx.send_replace(inner.state.clone());
        }
        inner.state.clone()
    }

    /// Waits until every background action queued so far has finished.
    ///
    /// Nothing is cancelled; this only observes completion.
    pub async fn settle(&self) {
        let (ack, done) = oneshot::channel();
        if self.jobs.send(Job::Flush(ack)).is_err() {
            return;
        }
        if done.await.is_err() {
            tracing::warn!("Persistence worker stopped before flush");
        }
    }

    fn persist_then_fetch<F>(
        &self,
        operation: PersistOperation,
        id: PersonId,
        call: F,
    ) -> Result<PeopleState>
    where
        F: FnOnce(&PersonRepository<S>) -> Result<()>,
    {
        tracing::debug!(%operation, id = %id, "persist");
        if let Err(e) = call(&self.repository) {
            self.report(operation, Some(id), &e);
            return Err(e);
        }
        self.fetch()
    }

    fn enqueue(&self, action: BackgroundAction) {
        if let Err(mpsc::error::SendError(Job::Persist(action))) =
            self.jobs.send(Job::Persist(action))
        {
            let err = Error::io("queue_persistence", "persistence worker stopped");
            publish_failure(&self.events, &action, &err);
        }
    }

    fn modify(&self, change: impl FnOnce(&mut PeopleState)) -> PeopleState {
        let mut inner = self.lock();
        change(&mut inner.state);
        self.state_tx.send_replace(inner.state.clone());
        inner.state.clone()
    }

    fn report(&self, operation: PersistOperation, person_id: Option<PersonId>, error: &Error) {
        self.events.publish(PersonEvent::OperationFailed {
            meta: EventMeta::new(EVENT_SOURCE),
            operation,
            person_id,
            error: error.to_string(),
        });
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The state is plain data; a panic elsewhere cannot leave it half-built.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn person_id(person: &Person) -> &PersonId {
    &person.id
}

fn publish_failure(events: &EventBus, action: &BackgroundAction, error: &Error) {
    tracing::warn!(
        operation = %action.operation(),
        id = %action.person().id,
        error = %error,
        "Background persistence failed"
    );
    events.publish(PersonEvent::PersistenceFailed {
        meta: EventMeta::new(EVENT_SOURCE),
        operation: action.operation(),
        person_id: action.person().id.clone(),
        error: error.to_string(),
    });
}

/// Runs queued repository calls one at a time on the blocking pool.
async fn run_worker<S: DataStore + 'static>(
    repository: Arc<PersonRepository<S>>,
    events: EventBus,
    mut rx: mpsc::UnboundedReceiver<Job>,
) {
    while let Some(job) = rx.recv().await {
        match job {
            Job::Persist(action) => {
                let repo = Arc::clone(&repository);
                let outcome = tokio::task::spawn_blocking(move || {
                    let result = action.apply(&repo);
                    (action, result)
                })
                .await;

                match outcome {
                    Ok((_, Ok(()))) => {},
                    Ok((action, Err(e))) => publish_failure(&events, &action, &e),
                    Err(e) => tracing::error!(error = %e, "Persistence task panicked"),
                }
            },
            Job::Flush(ack) => {
                let _ = ack.send(());
            },
        }
    }
    tracing::debug!("Persistence worker stopped");
}
