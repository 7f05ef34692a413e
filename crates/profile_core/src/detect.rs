use crate::{Manifest, PollState};

/// True iff the candidate manifest is strictly newer than the last one acted upon.
///
/// A zero timestamp never counts as a change, so producers that omit the
/// field simply never trigger an automatic refresh.
pub fn has_changed(candidate: &Manifest, state: &PollState) -> bool {
    candidate.modified_at > 0 && candidate.modified_at > state.last_seen_modified_at
}
