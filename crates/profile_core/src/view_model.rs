use crate::{FileRecord, Notification, NotificationId, NotificationKind, NotificationPhase};

/// Number of leading characters shown on a file card.
pub const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// A load cycle is in flight; the refresh trigger should look disabled.
    pub busy: bool,
    /// At least one cycle has finished (successfully or not).
    pub loaded: bool,
    pub files: Vec<FileCardView>,
    pub total_files: usize,
    pub total_chars: u64,
    pub detail: Option<FileDetailView>,
    pub error: Option<String>,
    pub failed_files: Vec<String>,
    pub notifications: Vec<NotificationView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCardView {
    pub name: String,
    pub length: usize,
    pub preview: String,
    pub preview_truncated: bool,
    pub is_new: bool,
}

impl FileCardView {
    pub(crate) fn from_record(record: &FileRecord, is_new: bool) -> Self {
        let (preview, preview_truncated) = preview_of(&record.content);
        Self {
            name: record.name.clone(),
            length: record.length,
            preview,
            preview_truncated,
            is_new,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetailView {
    pub name: String,
    pub content: String,
    pub length: usize,
}

impl FileDetailView {
    pub(crate) fn from_record(record: &FileRecord) -> Self {
        Self {
            name: record.name.clone(),
            content: record.content.clone(),
            length: record.length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub dismissing: bool,
}

impl NotificationView {
    pub(crate) fn from_notification(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            message: notification.message.clone(),
            kind: notification.kind,
            dismissing: notification.phase == NotificationPhase::Dismissing,
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `content`, and whether anything was cut.
pub fn preview_of(content: &str) -> (String, bool) {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => (content[..end].to_string(), true),
        None => (content.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::{preview_of, PREVIEW_CHARS};

    #[test]
    fn short_content_kept_as_is() {
        assert_eq!(preview_of("short"), ("short".to_string(), false));
    }

    #[test]
    fn exact_length_is_not_truncated() {
        let content = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview_of(&content), (content.clone(), false));
    }

    #[test]
    fn multibyte_content_cut_on_char_boundary() {
        let content = "가".repeat(PREVIEW_CHARS + 5);
        let (preview, truncated) = preview_of(&content);
        assert!(truncated);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS);
    }
}
