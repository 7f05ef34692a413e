//! Profile watch core: pure refresh state machine, reconciliation and view-model helpers.
mod detect;
mod effect;
mod model;
mod msg;
mod notify;
mod reconcile;
mod state;
mod update;
mod view_model;

pub use detect::has_changed;
pub use effect::Effect;
pub use model::{CycleId, FileRecord, LoadedCycle, Manifest, PollState, Snapshot};
pub use msg::Msg;
pub use notify::{
    Notification, NotificationId, NotificationKind, NotificationPhase, NotificationQueue,
};
pub use reconcile::{reconcile, ItemStatus};
pub use state::{AppState, CoreSettings, CycleOutcome, RefreshPhase, RefreshTrigger};
pub use update::update;
pub use view_model::{
    preview_of, AppViewModel, FileCardView, FileDetailView, NotificationView, PREVIEW_CHARS,
};
