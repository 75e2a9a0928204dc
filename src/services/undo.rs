//! Single-slot undo for optimistic removal.
//!
//! Pure functions over a list and an [`UndoSlot`]. They never touch storage;
//! the controller decides when to persist.
//!
//! ```text
//!            remove(x)                 remove(y)
//!  Empty  ─────────────▶ Holding(x) ─────────────▶ Holding(y)   (x is gone for good)
//!    ▲                       │
//!    └─────── undo ──────────┘   x reinserted at min(index, len)
//! ```

/// Holds at most one removed item and the index it occupied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UndoSlot<T> {
    /// Nothing to undo.
    #[default]
    Empty,
    /// The most recent removal.
    Holding {
        /// The removed value, exactly as it was in the list.
        item: T,
        /// Zero-based position in the list before removal.
        original_index: usize,
    },
}

impl<T> UndoSlot<T> {
    /// Returns `true` if nothing is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the held item, if any.
    #[must_use]
    pub const fn item(&self) -> Option<&T> {
        match self {
            Self::Empty => None,
            Self::Holding { item, .. } => Some(item),
        }
    }

    /// Returns the held item's original index, if any.
    #[must_use]
    pub const fn original_index(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::Holding { original_index, .. } => Some(*original_index),
        }
    }
}

/// Result of [`optimistic_undo_remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoRemoval<T> {
    /// The slot was empty; nothing changed.
    Nothing,
    /// An item with the held id is already in the list; the slot is spent
    /// but the list is unchanged.
    AlreadyPresent,
    /// The held item was reinserted.
    Restored {
        /// The list with the item reinserted.
        list: Vec<T>,
        /// The reinserted item.
        item: T,
        /// Where it was reinserted.
        index: usize,
    },
}

/// Removes the first element whose id matches `item`'s id.
///
/// Returns `None` when no element matches. Otherwise returns the new list and
/// a slot holding the removed element and its index. The returned slot
/// replaces whatever the caller held before.
pub fn optimistic_remove<T, K, F>(list: &[T], item: &T, id_of: F) -> Option<(Vec<T>, UndoSlot<T>)>
where
    T: Clone,
    K: PartialEq + ?Sized,
    F: Fn(&T) -> &K,
{
    let target = id_of(item);
    let index = list.iter().position(|x| id_of(x) == target)?;

    let mut updated = list.to_vec();
    let removed = updated.remove(index);
    Some((
        updated,
        UndoSlot::Holding {
            item: removed,
            original_index: index,
        },
    ))
}

/// Reinserts the held item at `min(original_index, list.len())`.
///
/// The slot is consumed in every case; after this call there is nothing left
/// to undo.
pub fn optimistic_undo_remove<T, K, F>(list: &[T], id_of: F, slot: UndoSlot<T>) -> UndoRemoval<T>
where
    T: Clone,
    K: PartialEq + ?Sized,
    F: Fn(&T) -> &K,
{
    let UndoSlot::Holding {
        item,
        original_index,
    } = slot
    else {
        return UndoRemoval::Nothing;
    };

    if list.iter().any(|x| id_of(x) == id_of(&item)) {
        return UndoRemoval::AlreadyPresent;
    }

    let index = original_index.min(list.len());
    let mut updated = list.to_vec();
    updated.insert(index, item.clone());
    UndoRemoval::Restored {
        list: updated,
        item,
        index,
    }
}
