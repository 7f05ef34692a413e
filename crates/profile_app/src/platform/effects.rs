use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use engine_logging::{engine_debug, engine_info, engine_warn};
use profile_core::{Effect, FileRecord, LoadedCycle, Manifest, Msg, RefreshTrigger};
use profile_engine::{
    CycleOutput, EngineEvent, EngineHandle, EventSink, FailureKind, FetchError, PollHandle,
    ReqwestSource,
};

use super::config::AppConfig;
use super::persistence::{save_snapshot, KeyValueFile};

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppInput {
    Core(Msg),
    Help,
    Quit,
}

pub struct EffectRunner {
    engine: EngineHandle,
    store: KeyValueFile,
    input_tx: mpsc::Sender<AppInput>,
}

impl EffectRunner {
    pub fn new(
        config: &AppConfig,
        store: KeyValueFile,
        input_tx: mpsc::Sender<AppInput>,
    ) -> anyhow::Result<Self> {
        let source = ReqwestSource::new(config.fetch_settings())?;
        let sink = Arc::new(MsgSink {
            tx: input_tx.clone(),
        });
        let engine = EngineHandle::new(Arc::new(source), sink)?;
        Ok(Self {
            engine,
            store,
            input_tx,
        })
    }

    pub fn start_polling(&self, interval: Duration) -> PollHandle {
        engine_info!("Polling manifest every {:?}", interval);
        self.engine.start_polling(interval)
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartCycle { cycle_id, trigger } => {
                    engine_debug!("StartCycle cycle_id={} trigger={:?}", cycle_id, trigger);
                    self.engine.run_cycle(cycle_id, trigger.bypass_cache());
                }
                Effect::PersistSnapshot(snapshot) => {
                    engine_debug!("Persisting {} known files", snapshot.known_names.len());
                    save_snapshot(&self.store, &snapshot);
                }
                Effect::ScheduleRefresh { delay_ms } => {
                    self.schedule(
                        delay_ms,
                        Msg::RefreshRequested {
                            trigger: RefreshTrigger::Poll,
                        },
                    );
                }
                Effect::ScheduleNotificationExpiry { id, after_ms } => {
                    self.schedule(after_ms, Msg::NotificationExpired(id));
                }
                Effect::ScheduleNotificationRemoval { id, after_ms } => {
                    self.schedule(after_ms, Msg::NotificationRemoved(id));
                }
            }
        }
    }

    fn schedule(&self, delay_ms: u64, msg: Msg) {
        let tx = self.input_tx.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(delay_ms));
            let _ = tx.send(AppInput::Core(msg));
        });
    }
}

struct MsgSink {
    tx: mpsc::Sender<AppInput>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppInput::Core(map_event(event, now_ms())));
    }
}

pub(crate) fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

fn map_event(event: EngineEvent, now_ms: u64) -> Msg {
    match event {
        EngineEvent::CycleCompleted { cycle_id, result } => Msg::CycleFinished {
            cycle_id,
            result: result.map(map_cycle).map_err(describe_manifest_error),
            completed_at: now_ms,
        },
        EngineEvent::ManifestPolled(manifest) => Msg::ManifestPolled(map_manifest(manifest)),
    }
}

fn map_manifest(manifest: profile_engine::Manifest) -> Manifest {
    Manifest::new(manifest.names, manifest.modified_at)
}

fn map_cycle(output: CycleOutput) -> LoadedCycle {
    let failed = output
        .failed
        .into_iter()
        .map(|failure| failure.name)
        .collect();
    LoadedCycle {
        manifest: map_manifest(output.manifest),
        records: output
            .files
            .into_iter()
            .map(|file| FileRecord::new(file.name, file.content))
            .collect(),
        failed,
    }
}

fn describe_manifest_error(err: FetchError) -> String {
    engine_warn!("Manifest load failed: {}", err);
    match err.kind {
        FailureKind::Parse => "The file list is malformed.".to_string(),
        ref kind if kind.is_unreachable() => format!("The file list could not be reached ({kind})."),
        _ => format!("The file list could not be loaded ({}).", err.kind),
    }
}
