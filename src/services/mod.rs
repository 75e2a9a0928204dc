//! Business logic services.
//!
//! The repository wraps a [`DataStore`](crate::storage::DataStore) and logs
//! every failure; the controller keeps the visible list and undo slot in sync
//! with it.

mod controller;
mod repository;
pub mod undo;

pub use controller::{PeopleController, PeopleState};
pub use repository::PersonRepository;
pub use undo::{UndoRemoval, UndoSlot, optimistic_remove, optimistic_undo_remove};
