use crate::{CycleId, NotificationId, RefreshTrigger, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the manifest and then every listed file.
    StartCycle {
        cycle_id: CycleId,
        trigger: RefreshTrigger,
    },
    /// Write the snapshot to durable storage.
    PersistSnapshot(Snapshot),
    /// Deliver `Msg::RefreshRequested { trigger: Poll }` after the delay.
    ScheduleRefresh { delay_ms: u64 },
    /// Deliver `Msg::NotificationExpired` after the delay.
    ScheduleNotificationExpiry { id: NotificationId, after_ms: u64 },
    /// Deliver `Msg::NotificationRemoved` after the delay.
    ScheduleNotificationRemoval { id: NotificationId, after_ms: u64 },
}
