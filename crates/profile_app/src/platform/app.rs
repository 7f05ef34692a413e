use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_info, engine_warn};
use profile_core::{update, AppState, AppViewModel, Msg, RefreshTrigger};

use super::config::AppConfig;
use super::effects::{AppInput, EffectRunner};
use super::persistence::{load_snapshot, KeyValueFile};
use super::ui;

pub fn run_watch(config: AppConfig, poll: bool) -> anyhow::Result<()> {
    let (input_tx, input_rx) = mpsc::channel::<AppInput>();

    let store = KeyValueFile::new(&config.state_dir);
    let snapshot = load_snapshot(&store);
    let runner = EffectRunner::new(&config, store, input_tx.clone())?;
    let mut session = Session::new(AppState::with_settings(config.core_settings()), runner);

    session.dispatch(Msg::SnapshotRestored(snapshot));
    session.dispatch(Msg::RefreshRequested {
        trigger: RefreshTrigger::Startup,
    });

    let poll_handle = poll.then(|| session.runner.start_polling(config.poll_interval()));
    spawn_input_reader(input_tx);

    while let Ok(input) = input_rx.recv() {
        match input {
            AppInput::Core(msg) => session.dispatch(msg),
            AppInput::Help => print_lines(&ui::render::help(), false),
            AppInput::Quit => break,
        }
    }

    if let Some(handle) = poll_handle {
        handle.stop();
    }
    engine_info!("Watch session ended");
    Ok(())
}

/// Owns the state for one client session and routes effects to the runner.
struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let maybe_view = state.consume_dirty().then(|| state.view());
        self.state = state;

        self.runner.run(effects);
        if let Some(view) = maybe_view {
            render_screen(&view);
        }
    }
}

fn render_screen(view: &AppViewModel) {
    print_lines(&ui::render::render(view), true);
}

fn print_lines(lines: &[String], clear: bool) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if clear && stdout.is_terminal() {
        let _ = write!(out, "\x1b[2J\x1b[H");
    }
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    let _ = out.flush();
}

fn spawn_input_reader(input_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    engine_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            if let Some(input) = ui::input::parse_command(&line) {
                if input_tx.send(input).is_err() {
                    return;
                }
            }
        }
        // Without stdin the session keeps running until interrupted.
        engine_info!("Input closed; manual commands disabled");
    });
}
