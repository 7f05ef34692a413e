use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, FileCardView, FileDetailView, NotificationView};
use crate::{
    reconcile, CycleId, Effect, FileRecord, ItemStatus, LoadedCycle, NotificationId,
    NotificationKind, NotificationPhase, NotificationQueue, PollState, Snapshot,
};

/// What asked for a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// First load after the client starts.
    Startup,
    /// Explicit user request.
    Manual,
    /// Polling loop detected a newer manifest.
    Poll,
}

impl RefreshTrigger {
    /// Not asked for by the user, so completion is not announced.
    pub fn is_automatic(self) -> bool {
        !matches!(self, RefreshTrigger::Manual)
    }

    /// Every fetch except the startup load must defeat intermediate caches.
    pub fn bypass_cache(self) -> bool {
        !matches!(self, RefreshTrigger::Startup)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    #[default]
    Idle,
    Loading {
        cycle_id: CycleId,
        trigger: RefreshTrigger,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Success,
    PartialFailure { failed: Vec<String> },
    HardFailure { message: String },
}

/// Timing knobs that the core hands out through effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSettings {
    pub auto_refresh_delay_ms: u64,
    pub notification_visible_ms: u64,
    pub notification_dismiss_ms: u64,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            auto_refresh_delay_ms: 1_000,
            notification_visible_ms: 3_000,
            notification_dismiss_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: CoreSettings,
    poll: PollState,
    phase: RefreshPhase,
    snapshot: Snapshot,
    records: Vec<FileRecord>,
    statuses: BTreeMap<String, ItemStatus>,
    notifications: NotificationQueue,
    selected: Option<String>,
    last_outcome: Option<CycleOutcome>,
    next_cycle_id: CycleId,
    /// A poll refresh arrived while another cycle was loading.
    deferred_poll: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> CoreSettings {
        self.settings
    }

    pub fn poll_state(&self) -> PollState {
        self.poll
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn statuses(&self) -> &BTreeMap<String, ItemStatus> {
        &self.statuses
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn last_outcome(&self) -> Option<&CycleOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        let files: Vec<FileCardView> = self
            .records
            .iter()
            .map(|record| {
                let is_new = self
                    .statuses
                    .get(&record.name)
                    .is_some_and(|status| status.is_new);
                FileCardView::from_record(record, is_new)
            })
            .collect();

        let detail = self.selected.as_ref().and_then(|name| {
            self.records
                .iter()
                .find(|record| &record.name == name)
                .map(FileDetailView::from_record)
        });

        let (error, failed_files) = match &self.last_outcome {
            Some(CycleOutcome::HardFailure { message }) => (Some(message.clone()), Vec::new()),
            Some(CycleOutcome::PartialFailure { failed }) => (None, failed.clone()),
            _ => (None, Vec::new()),
        };

        AppViewModel {
            busy: self.poll.refreshing,
            loaded: self.last_outcome.is_some(),
            total_files: files.len(),
            total_chars: self.records.iter().map(|record| record.length as u64).sum(),
            files,
            detail,
            error,
            failed_files,
            notifications: self
                .notifications
                .entries()
                .iter()
                .map(NotificationView::from_notification)
                .collect(),
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn restore_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }

    /// Single-flight entry: returns the new cycle id, or `None` while a cycle
    /// is already in flight.
    pub(crate) fn begin_cycle(&mut self, trigger: RefreshTrigger) -> Option<CycleId> {
        if self.poll.refreshing {
            return None;
        }
        self.next_cycle_id += 1;
        let cycle_id = self.next_cycle_id;
        self.poll.refreshing = true;
        self.phase = RefreshPhase::Loading { cycle_id, trigger };
        self.mark_dirty();
        Some(cycle_id)
    }

    /// Returns the trigger of the in-flight cycle when `cycle_id` matches it
    /// and moves back to `Idle`. Stale completions return `None`.
    pub(crate) fn finish_cycle(&mut self, cycle_id: CycleId) -> Option<RefreshTrigger> {
        match self.phase {
            RefreshPhase::Loading {
                cycle_id: current,
                trigger,
            } if current == cycle_id => {
                self.phase = RefreshPhase::Idle;
                self.poll.refreshing = false;
                self.mark_dirty();
                Some(trigger)
            }
            _ => None,
        }
    }

    pub(crate) fn defer_poll_refresh(&mut self) {
        self.deferred_poll = true;
    }

    pub(crate) fn take_deferred_poll(&mut self) -> bool {
        std::mem::take(&mut self.deferred_poll)
    }

    pub(crate) fn observe_modified_at(&mut self, modified_at: u64) {
        self.poll.last_seen_modified_at = self.poll.last_seen_modified_at.max(modified_at);
    }

    /// Reconciles against the previous snapshot, replaces all records and
    /// returns the snapshot to persist.
    pub(crate) fn apply_loaded(&mut self, loaded: LoadedCycle, completed_at: u64) -> Snapshot {
        let LoadedCycle {
            manifest,
            records,
            failed,
        } = loaded;

        self.statuses = reconcile(manifest.names.as_slice(), &self.snapshot);
        self.snapshot = Snapshot {
            known_names: manifest.names.iter().cloned().collect(),
            visited_at: Some(completed_at),
        };
        self.observe_modified_at(manifest.modified_at);
        self.records = records;

        if let Some(name) = &self.selected {
            if !self.records.iter().any(|record| &record.name == name) {
                self.selected = None;
            }
        }

        self.last_outcome = Some(if failed.is_empty() {
            CycleOutcome::Success
        } else {
            CycleOutcome::PartialFailure { failed }
        });
        self.mark_dirty();
        self.snapshot.clone()
    }

    pub(crate) fn apply_hard_failure(&mut self, message: String) {
        self.records.clear();
        self.statuses.clear();
        self.selected = None;
        self.last_outcome = Some(CycleOutcome::HardFailure { message });
        self.mark_dirty();
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) -> Vec<Effect> {
        let id = self.notifications.push(message, kind);
        self.mark_dirty();
        vec![Effect::ScheduleNotificationExpiry {
            id,
            after_ms: self.settings.notification_visible_ms,
        }]
    }

    pub(crate) fn expire_notification(&mut self, id: NotificationId) -> Vec<Effect> {
        if !self.notifications.begin_dismiss(id) {
            return Vec::new();
        }
        self.mark_dirty();
        vec![Effect::ScheduleNotificationRemoval {
            id,
            after_ms: self.settings.notification_dismiss_ms,
        }]
    }

    pub(crate) fn remove_notification(&mut self, id: NotificationId) {
        let dismissing = self
            .notifications
            .entries()
            .iter()
            .any(|entry| entry.id == id && entry.phase == NotificationPhase::Dismissing);
        if dismissing && self.notifications.remove(id) {
            self.mark_dirty();
        }
    }

    pub(crate) fn select(&mut self, index: usize) {
        if let Some(record) = self.records.get(index) {
            self.selected = Some(record.name.clone());
            self.mark_dirty();
        }
    }

    pub(crate) fn close_detail(&mut self) {
        if self.selected.take().is_some() {
            self.mark_dirty();
        }
    }
}
