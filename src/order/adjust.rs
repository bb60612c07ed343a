//! Pure adjustments of a display order.
//!
//! An order is a list of storage positions. Storage positions shift whenever
//! an item is inserted at the front of, or removed from, the backing array;
//! these functions rewrite an order so that every entry keeps pointing at the
//! same item. They are used unchanged for item-level collections and for the
//! meta lists that order the collections themselves.

use super::validate::validate_reorder;
use super::OrderError;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Outcome of [`on_delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAdjustment {
    pub order: Vec<usize>,
    /// Whether the deleted position was present in the order
    pub found: bool,
}

/// How a client-submitted order is checked before it replaces the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderCheck {
    /// Reject values outside `[0, storage_length)`
    Validate { storage_length: usize },
    /// Store verbatim (meta lists)
    Trusted,
}

/// Adjust an order for an item inserted at storage position 0.
///
/// Existing entries move one position right; the new item is appended so it
/// displays last. Without an existing order the result is storage order of
/// the old items followed by the new one: `[1, 2, ..., n-1, 0]`.
#[must_use]
pub fn on_append_at_front(order: Option<&[usize]>, new_storage_length: usize) -> Vec<usize> {
    match order {
        Some(existing) if !existing.is_empty() => existing
            .iter()
            .map(|position| position.saturating_add(1))
            .chain(std::iter::once(0))
            .collect(),
        _ => (1..new_storage_length).chain(std::iter::once(0)).collect(),
    }
}

/// Adjust an order for the item removed from storage `deleted_position`.
///
/// The first occurrence of `deleted_position` is dropped, later positions
/// move one step left, and anything outside `[0, new_storage_length)` is
/// discarded. A missing `deleted_position` is reported through
/// [`DeleteAdjustment::found`] but does not stop the adjustment.
#[must_use]
pub fn on_delete(
    order: &[usize],
    deleted_position: usize,
    new_storage_length: usize,
) -> DeleteAdjustment {
    let mut remaining = order.to_vec();
    let found = match remaining.iter().position(|&p| p == deleted_position) {
        Some(index) => {
            remaining.remove(index);
            true
        }
        None => false,
    };

    let order = remaining
        .into_iter()
        .map(|p| if p > deleted_position { p.saturating_sub(1) } else { p })
        .filter(|&p| p < new_storage_length)
        .collect();
    DeleteAdjustment { order, found }
}

/// Replace `order` with `new_order` if it passes `check`.
///
/// On rejection `order` is left untouched.
pub fn on_explicit_reorder(
    collection_id: &str,
    order: &mut Vec<usize>,
    new_order: &[usize],
    check: ReorderCheck,
) -> Result<(), OrderError> {
    if let ReorderCheck::Validate { storage_length } = check {
        if let Err(e) = validate_reorder(collection_id, new_order, storage_length) {
            warn!(collection_id, retained = ?order, "Kept previous order: {e}");
            return Err(e);
        }
    }
    debug!(collection_id, ?new_order, "Replaced order");
    new_order.clone_into(order);
    Ok(())
}

/// The effective display order of a collection.
///
/// Valid first occurrences from `order`, then every storage position the
/// order does not mention, ascending. No order means storage order.
#[must_use]
pub fn display_positions(order: Option<&[usize]>, storage_length: usize) -> Vec<usize> {
    let mut seen = vec![false; storage_length];
    let mut positions = Vec::with_capacity(storage_length);
    for &position in order.unwrap_or_default() {
        if let Some(slot) = seen.get_mut(position) {
            if !*slot {
                *slot = true;
                positions.push(position);
            }
        }
    }
    positions.extend(
        seen.iter()
            .enumerate()
            .filter(|&(_, &shown)| !shown)
            .map(|(position, _)| position),
    );
    positions
}

/// Move the item shown at display index `from` to display index `to`.
///
/// Returns `None` when either index is outside the display order.
#[must_use]
pub fn move_to_index(
    order: Option<&[usize]>,
    storage_length: usize,
    from: usize,
    to: usize,
) -> Option<Vec<usize>> {
    let mut positions = display_positions(order, storage_length);
    if from >= positions.len() || to >= positions.len() {
        return None;
    }
    let moved = positions.remove(from);
    positions.insert(to, moved);
    Some(positions)
}

/// Drop out-of-range values and repeated positions, keeping first occurrences.
#[must_use]
pub fn normalize(order: &[usize], storage_length: usize) -> Vec<usize> {
    let mut seen = BTreeSet::new();
    order
        .iter()
        .copied()
        .filter(|&p| p < storage_length && seen.insert(p))
        .collect()
}

/// Tagged positions after an insert at storage position 0.
#[must_use]
pub fn shift_tags_for_insert(positions: &BTreeSet<usize>) -> BTreeSet<usize> {
    positions.iter().map(|p| p.saturating_add(1)).collect()
}

/// Tagged positions after the item at `deleted_position` was removed.
#[must_use]
pub fn shift_tags_for_delete(positions: &BTreeSet<usize>, deleted_position: usize) -> BTreeSet<usize> {
    positions
        .iter()
        .copied()
        .filter(|&p| p != deleted_position)
        .map(|p| if p > deleted_position { p.saturating_sub(1) } else { p })
        .collect()
}

#[cfg(test)]
#[path = "adjust_tests.rs"]
mod tests;
