pub type NotificationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Dismissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub phase: NotificationPhase,
}

/// Stacked, time-boxed user messages in order of appearance.
///
/// No deduplication happens here; every `push` adds a new entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationQueue {
    entries: Vec<Notification>,
    next_id: NotificationId,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(Notification {
            id,
            message: message.into(),
            kind,
            phase: NotificationPhase::Visible,
        });
        id
    }

    /// Moves a visible entry to `Dismissing`. Returns false for unknown or
    /// already dismissing ids.
    pub fn begin_dismiss(&mut self, id: NotificationId) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) if entry.phase == NotificationPhase::Visible => {
                entry.phase = NotificationPhase::Dismissing;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
