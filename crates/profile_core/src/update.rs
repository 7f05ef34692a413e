use crate::{has_changed, AppState, Effect, Msg, NotificationKind, RefreshTrigger};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SnapshotRestored(snapshot) => {
            state.restore_snapshot(snapshot);
            Vec::new()
        }
        Msg::RefreshRequested { trigger } => match state.begin_cycle(trigger) {
            Some(cycle_id) => vec![Effect::StartCycle { cycle_id, trigger }],
            // Single-flight: a request while loading joins the running cycle.
            None => {
                if trigger == RefreshTrigger::Poll {
                    state.defer_poll_refresh();
                }
                Vec::new()
            }
        },
        Msg::ManifestPolled(manifest) => {
            if !has_changed(&manifest, &state.poll_state()) {
                return (state, Vec::new());
            }
            state.observe_modified_at(manifest.modified_at);
            let mut effects = state.notify(
                "New changes detected. Refreshing the file list...",
                NotificationKind::Info,
            );
            effects.push(Effect::ScheduleRefresh {
                delay_ms: state.settings().auto_refresh_delay_ms,
            });
            effects
        }
        Msg::CycleFinished {
            cycle_id,
            result,
            completed_at,
        } => {
            let Some(trigger) = state.finish_cycle(cycle_id) else {
                return (state, Vec::new());
            };
            let deferred_poll = state.take_deferred_poll();
            match result {
                Ok(loaded) => {
                    let loaded_count = loaded.records.len();
                    // The finished cycle read a manifest older than the one the
                    // poll announced, so the deferred refresh still has work to do.
                    let behind =
                        loaded.manifest.modified_at < state.poll_state().last_seen_modified_at;
                    let snapshot = state.apply_loaded(loaded, completed_at);
                    let mut effects = vec![Effect::PersistSnapshot(snapshot)];
                    // Only user-requested cycles announce completion.
                    if !trigger.is_automatic() {
                        effects.extend(state.notify(
                            format!("File list refreshed ({loaded_count} files)."),
                            NotificationKind::Success,
                        ));
                    }
                    if deferred_poll && behind {
                        if let Some(cycle_id) = state.begin_cycle(RefreshTrigger::Poll) {
                            effects.push(Effect::StartCycle {
                                cycle_id,
                                trigger: RefreshTrigger::Poll,
                            });
                        }
                    }
                    effects
                }
                Err(message) => {
                    state.apply_hard_failure(message.clone());
                    if trigger == RefreshTrigger::Startup {
                        Vec::new()
                    } else {
                        state.notify(
                            format!("Could not load the file list: {message}"),
                            NotificationKind::Error,
                        )
                    }
                }
            }
        }
        Msg::NotificationExpired(id) => state.expire_notification(id),
        Msg::NotificationRemoved(id) => {
            state.remove_notification(id);
            Vec::new()
        }
        Msg::FileSelected(index) => {
            state.select(index);
            Vec::new()
        }
        Msg::DetailClosed => {
            state.close_detail();
            Vec::new()
        }
    };

    (state, effects)
}
