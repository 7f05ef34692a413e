use profile_core::{AppViewModel, FileCardView, NotificationKind, NotificationView};

const RULE: &str = "------------------------------------------------------------";

/// Renders the full screen as lines of text.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let status = if view.busy { "  [refreshing...]" } else { "" };
    lines.push(format!(
        "Files: {} | Characters: {}{}",
        view.total_files,
        format_with_commas(view.total_chars),
        status
    ));
    lines.push(RULE.to_string());

    if let Some(error) = &view.error {
        lines.push(format!("Could not load the file list. {error}"));
        lines.push("Press r to try again.".to_string());
    } else if !view.loaded {
        lines.push("Loading files...".to_string());
    } else if view.files.is_empty() {
        lines.push("No files.".to_string());
    } else {
        for (index, card) in view.files.iter().enumerate() {
            lines.extend(format_card(index, card));
        }
    }

    if !view.failed_files.is_empty() {
        lines.push(format!("Not loaded: {}", view.failed_files.join(", ")));
    }

    if let Some(detail) = &view.detail {
        lines.push(RULE.to_string());
        lines.push(format!(
            "{} ({} chars)",
            detail.name,
            format_with_commas(detail.length as u64)
        ));
        lines.push(RULE.to_string());
        lines.extend(detail.content.lines().map(ToOwned::to_owned));
        lines.push(RULE.to_string());
        lines.push("x: close".to_string());
    }

    if !view.notifications.is_empty() {
        lines.push(String::new());
        lines.extend(view.notifications.iter().map(format_notification));
    }

    lines.push(String::new());
    let refresh = if view.busy { "(refreshing)" } else { "r: refresh" };
    lines.push(format!("{refresh} | <n>: open | x: close | h: help | q: quit"));
    lines
}

pub fn help() -> Vec<String> {
    vec![
        "r, refresh   reload the file list now".to_string(),
        "<n>          show file number n".to_string(),
        "x, esc       close the open file".to_string(),
        "q, quit      exit".to_string(),
    ]
}

fn format_card(index: usize, card: &FileCardView) -> Vec<String> {
    let badge = if card.is_new { " [NEW]" } else { "" };
    let ellipsis = if card.preview_truncated { "..." } else { "" };
    let preview = card.preview.replace(['\r', '\n'], " ");
    vec![
        format!(
            "{:>3}. {}{} - {} chars",
            index + 1,
            card.name,
            badge,
            format_with_commas(card.length as u64)
        ),
        format!("     {preview}{ellipsis}"),
    ]
}

fn format_notification(notification: &NotificationView) -> String {
    let label = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Info => "info",
        NotificationKind::Error => "error",
    };
    if notification.dismissing {
        format!("  ({label}) {}", notification.message)
    } else {
        format!("  [{label}] {}", notification.message)
    }
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use profile_core::{AppViewModel, FileCardView, NotificationKind, NotificationView};

    use super::{format_with_commas, render};

    fn card(name: &str, is_new: bool) -> FileCardView {
        FileCardView {
            name: name.to_string(),
            length: 1234,
            preview: "first line\nsecond".to_string(),
            preview_truncated: true,
            is_new,
        }
    }

    #[test]
    fn commas_group_thousands() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1_234_567), "1,234,567");
    }

    #[test]
    fn cards_show_new_badge_and_preview() {
        let view = AppViewModel {
            loaded: true,
            total_files: 2,
            total_chars: 2468,
            files: vec![card("a.txt", false), card("b.txt", true)],
            ..AppViewModel::default()
        };
        let lines = render(&view);

        assert_eq!(lines[0], "Files: 2 | Characters: 2,468");
        assert!(lines.contains(&"  1. a.txt - 1,234 chars".to_string()));
        assert!(lines.contains(&"  2. b.txt [NEW] - 1,234 chars".to_string()));
        assert!(lines.contains(&"     first line second...".to_string()));
    }

    #[test]
    fn busy_state_disables_refresh_hint() {
        let view = AppViewModel {
            busy: true,
            ..AppViewModel::default()
        };
        let lines = render(&view);

        assert!(lines[0].ends_with("[refreshing...]"));
        assert!(lines.contains(&"Loading files...".to_string()));
        assert!(lines.last().unwrap().starts_with("(refreshing)"));
    }

    #[test]
    fn error_and_empty_states() {
        let failed = AppViewModel {
            loaded: true,
            error: Some("The file list is malformed.".to_string()),
            ..AppViewModel::default()
        };
        assert!(render(&failed)
            .iter()
            .any(|line| line.ends_with("The file list is malformed.")));

        let empty = AppViewModel {
            loaded: true,
            ..AppViewModel::default()
        };
        assert!(render(&empty).contains(&"No files.".to_string()));
    }

    #[test]
    fn notifications_render_in_order() {
        let view = AppViewModel {
            notifications: vec![
                NotificationView {
                    id: 1,
                    message: "first".to_string(),
                    kind: NotificationKind::Info,
                    dismissing: true,
                },
                NotificationView {
                    id: 2,
                    message: "second".to_string(),
                    kind: NotificationKind::Success,
                    dismissing: false,
                },
            ],
            ..AppViewModel::default()
        };
        let lines = render(&view);
        let first = lines.iter().position(|l| l == "  (info) first").unwrap();
        let second = lines.iter().position(|l| l == "  [ok] second").unwrap();
        assert!(first < second);
    }
}
