//! Events emitted by the people controller.

use super::PersonId;
use crate::current_timestamp;
use std::fmt;
use uuid::Uuid;

/// Shared event metadata.
#[derive(Debug, Clone)]
pub struct EventMeta {
    /// Unique identifier for this event.
    pub event_id: String,
    /// Event source component.
    pub source: &'static str,
    /// Timestamp (Unix epoch seconds).
    pub timestamp: u64,
}

impl EventMeta {
    /// Creates new event metadata using the current timestamp.
    #[must_use]
    pub fn new(source: &'static str) -> Self {
        Self::with_timestamp(source, current_timestamp())
    }

    /// Creates new event metadata with a specified timestamp.
    #[must_use]
    pub fn with_timestamp(source: &'static str, timestamp: u64) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            source,
            timestamp,
        }
    }
}

/// Repository operation a controller action resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistOperation {
    /// Reload of the visible list.
    Fetch,
    /// Lookup of a single record.
    FetchById,
    /// Insert of a record.
    Create,
    /// Replacement of a record.
    Update,
    /// Removal of a record.
    Remove,
}

impl PersistOperation {
    /// Returns the operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::FetchById => "fetch_by_id",
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for PersistOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events published to the presentation layer.
#[derive(Debug, Clone)]
pub enum PersonEvent {
    /// A record was optimistically removed from the visible list.
    Removed {
        /// Event metadata.
        meta: EventMeta,
        /// The removed record's id.
        person_id: PersonId,
        /// Position it held in the visible list before removal.
        original_index: usize,
    },
    /// The pending removal was undone.
    Restored {
        /// Event metadata.
        meta: EventMeta,
        /// The restored record's id.
        person_id: PersonId,
        /// Position it was reinserted at.
        index: usize,
    },
    /// A synchronous controller operation failed; state was left unchanged.
    OperationFailed {
        /// Event metadata.
        meta: EventMeta,
        /// The failing operation.
        operation: PersistOperation,
        /// Record involved, if any.
        person_id: Option<PersonId>,
        /// Error message.
        error: String,
    },
    /// Background persistence of an optimistic change failed.
    ///
    /// The optimistic change stays visible; nothing is retried.
    PersistenceFailed {
        /// Event metadata.
        meta: EventMeta,
        /// The failing operation.
        operation: PersistOperation,
        /// Record involved.
        person_id: PersonId,
        /// Error message.
        error: String,
    },
}

impl PersonEvent {
    /// Returns the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Removed { .. } => "removed",
            Self::Restored { .. } => "restored",
            Self::OperationFailed { .. } => "operation_failed",
            Self::PersistenceFailed { .. } => "persistence_failed",
        }
    }

    /// Returns the event metadata.
    #[must_use]
    pub const fn meta(&self) -> &EventMeta {
        match self {
            Self::Removed { meta, .. }
            | Self::Restored { meta, .. }
            | Self::OperationFailed { meta, .. }
            | Self::PersistenceFailed { meta, .. } => meta,
        }
    }

    /// Returns `true` for either failure variant.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::OperationFailed { .. } | Self::PersistenceFailed { .. }
        )
    }
}
