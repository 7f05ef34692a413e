use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::engine_info;
use tokio_util::sync::CancellationToken;

use crate::cycle::load_cycle;
use crate::poll::{run_poll_loop, PollHandle};
use crate::{ContentSource, CycleId, EngineEvent};

/// Receiver of engine events; implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    RunCycle {
        cycle_id: CycleId,
        bypass_cache: bool,
    },
    StartPolling {
        interval: Duration,
        token: CancellationToken,
    },
}

/// Runs load cycles and the poll loop on a dedicated tokio runtime thread.
///
/// The engine does not enforce single-flight; callers decide when a cycle
/// may start.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(source: Arc<dyn ContentSource>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("profile-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let source = source.clone();
                    let sink = sink.clone();
                    runtime.spawn(async move {
                        handle_command(source.as_ref(), command, sink.as_ref()).await;
                    });
                }
                engine_info!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn run_cycle(&self, cycle_id: CycleId, bypass_cache: bool) {
        let _ = self.cmd_tx.send(EngineCommand::RunCycle {
            cycle_id,
            bypass_cache,
        });
    }

    /// Starts polling the manifest. The loop runs until the returned handle
    /// is stopped.
    pub fn start_polling(&self, interval: Duration) -> PollHandle {
        let token = CancellationToken::new();
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            interval,
            token: token.clone(),
        });
        PollHandle::new(token)
    }
}

async fn handle_command(source: &dyn ContentSource, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::RunCycle {
            cycle_id,
            bypass_cache,
        } => {
            let result = load_cycle(source, bypass_cache).await;
            sink.emit(EngineEvent::CycleCompleted { cycle_id, result });
        }
        EngineCommand::StartPolling { interval, token } => {
            run_poll_loop(source, interval, token, sink).await;
        }
    }
}
