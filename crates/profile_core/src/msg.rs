use crate::{CycleId, LoadedCycle, Manifest, NotificationId, RefreshTrigger, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Snapshot read from durable storage at startup.
    SnapshotRestored(Snapshot),
    /// Timer, user or startup asked for a reload.
    RefreshRequested { trigger: RefreshTrigger },
    /// Polling loop fetched a manifest.
    ManifestPolled(Manifest),
    /// Engine finished a load cycle. `Err` carries the manifest failure.
    CycleFinished {
        cycle_id: CycleId,
        result: Result<LoadedCycle, String>,
        completed_at: u64,
    },
    /// Visible period of a notification elapsed.
    NotificationExpired(NotificationId),
    /// Dismiss animation of a notification elapsed.
    NotificationRemoved(NotificationId),
    /// User opened the detail view for the file at a 0-based list position.
    FileSelected(usize),
    /// User closed the detail view.
    DetailClosed,
}
