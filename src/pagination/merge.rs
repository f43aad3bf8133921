//! Identity-based merge of incoming pages into the accumulated list

use std::collections::HashSet;
use std::hash::Hash;

/// Something with a stable identity used for de-duplication
pub trait Identified {
    /// Key type; two items with equal keys are the same item
    type Key: Eq + Hash;

    /// Identity key of this item
    fn identity(&self) -> Self::Key;
}

/// Merge `incoming` after `existing`, skipping items whose identity is already present
///
/// Arrival order is preserved and duplicates inside `incoming` are dropped as
/// well. Runs in O(existing + incoming).
pub fn merge<T, I>(existing: &[T], incoming: I) -> Vec<T>
where
    T: Identified + Clone,
    I: IntoIterator<Item = T>,
{
    let mut merged = existing.to_vec();
    merge_into(&mut merged, incoming);
    merged
}

/// In-place variant of [`merge`]; returns the number of items appended
pub fn merge_into<T, I>(existing: &mut Vec<T>, incoming: I) -> usize
where
    T: Identified,
    I: IntoIterator<Item = T>,
{
    let mut seen: HashSet<T::Key> = existing.iter().map(Identified::identity).collect();
    let before = existing.len();

    for item in incoming {
        if seen.insert(item.identity()) {
            existing.push(item);
        }
    }

    existing.len() - before
}
