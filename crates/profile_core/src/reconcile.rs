use std::collections::BTreeMap;

use crate::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemStatus {
    pub is_new: bool,
}

/// Marks each name as new when a previous visit exists and the name was not
/// known at that time.
///
/// Must be called with the snapshot as it was before the current cycle is
/// recorded; the updated snapshot contains every current name.
pub fn reconcile<S: AsRef<str>>(names: &[S], snapshot: &Snapshot) -> BTreeMap<String, ItemStatus> {
    let has_visited = snapshot.visited_at.is_some();
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let is_new = has_visited && !snapshot.known_names.contains(name);
            (name.to_string(), ItemStatus { is_new })
        })
        .collect()
}
