use profile_core::{update, AppState, Msg};

#[test]
fn closing_detail_without_selection_changes_nothing() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::DetailClosed);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn removing_unknown_notification_changes_nothing() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::NotificationRemoved(42));

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn selecting_past_the_end_changes_nothing() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::FileSelected(3));

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert!(next.view().detail.is_none());
}
