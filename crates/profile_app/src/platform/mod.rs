pub mod cli;

mod app;
mod config;
mod effects;
mod logging;
mod persistence;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use engine_logging::engine_info;
use profile_engine::generate_manifest;

use cli::{Cli, Command, GenerateArgs, WatchArgs};
use config::AppConfig;
use logging::LogDestination;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let destination = LogDestination::select(cli.log_file.clone(), cli.log_to_terminal);
    logging::initialize(destination, cli.log_level.unwrap_or(log::LevelFilter::Info));

    let mut config = AppConfig::load(cli.config.as_deref())?;
    match cli.command.unwrap_or(Command::Watch(WatchArgs::default())) {
        Command::Watch(args) => {
            if let Some(base_url) = args.base_url {
                config.base_url = base_url;
            }
            app::run_watch(config, !args.no_poll)
        }
        Command::Generate(args) => run_generate(&config, args),
    }
}

fn run_generate(config: &AppConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let dir = args
        .dir
        .unwrap_or_else(|| PathBuf::from(config.content_dir.trim_end_matches('/')));
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.manifest_path));
    let now_ms = effects::now_ms();

    let manifest = generate_manifest(&dir, &output, now_ms)
        .with_context(|| format!("generating manifest from {}", dir.display()))?;
    engine_info!(
        "Wrote {:?} with {} files (lastModified={})",
        output,
        manifest.names.len(),
        manifest.modified_at
    );
    println!("{} files listed in {}", manifest.names.len(), output.display());
    Ok(())
}
