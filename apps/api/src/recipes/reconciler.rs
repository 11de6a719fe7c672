//! Persistence Reconciler: merges recipes into a saved collection.
//!
//! Pure list transformations. The store wraps each one in a whole-list
//! read-modify-write so a failed write leaves the previous list in place.

use uuid::Uuid;

use crate::models::recipe::Recipe;

/// Outcome of a save, for logging and the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Replaced,
}

/// Saves `incoming` into `existing`.
///
/// A stored recipe matches when its id equals the incoming one; only when no
/// id matches does an equal title count. On match the stored entry is
/// replaced in place, keeping the stored id. Otherwise the recipe is prepended.
///
/// Returns the index of the stored recipe in the new collection.
pub fn save(existing: Vec<Recipe>, incoming: Recipe) -> (Vec<Recipe>, usize, SaveOutcome) {
    let mut collection = existing;
    let position = collection
        .iter()
        .position(|r| r.id == incoming.id)
        .or_else(|| collection.iter().position(|r| r.title == incoming.title));

    match position {
        Some(index) => {
            let kept_id = collection[index].id;
            collection[index] = Recipe {
                id: kept_id,
                ..incoming
            };
            (collection, index, SaveOutcome::Replaced)
        }
        None => {
            collection.insert(0, incoming);
            (collection, 0, SaveOutcome::Inserted)
        }
    }
}

/// Removes the recipe with `id`. Removing an absent id is a no-op.
pub fn delete(existing: Vec<Recipe>, id: Uuid) -> Vec<Recipe> {
    let mut collection = existing;
    collection.retain(|r| r.id != id);
    collection
}
