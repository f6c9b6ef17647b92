use super::id::EntryId;

/// Identifies records that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> EntryId;
}

/// Removes the record with the given id, reporting whether one was found.
pub(crate) fn remove_by_id<T: Identifiable>(items: &mut Vec<T>, id: EntryId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
