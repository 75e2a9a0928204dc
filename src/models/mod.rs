//! Data models for people-store.
//!
//! This module contains the record type and the events emitted around it.

mod events;
mod person;

pub use events::{EventMeta, PersistOperation, PersonEvent};
pub use person::{Person, PersonId};
