use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use host::{launch, pump, simulate, InputSource, LineSource};
use shared::{
    domain::Timestamp,
    protocol::{parse_script, GameEvent, SessionSnapshot},
};
use tokio::{io::BufReader, sync::broadcast};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "tapper", about = "Timed multi-touch tap session")]
struct Cli {
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Realtime session fed by JSON-lines commands on stdin.
    Play {
        #[arg(long)]
        auto_start: bool,
    },
    /// Offline run of a JSON-lines script on a virtual clock.
    Simulate {
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        horizon_ms: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (settings, ignored) = load_settings(&cli.config);

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    for note in ignored {
        warn!("config: ignoring {note}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let outcome = runtime.block_on(async {
        match cli.command {
            Command::Play { auto_start } => {
                let stdin = LineSource::new(BufReader::new(tokio::io::stdin()));
                let snapshot = play(&settings, auto_start, stdin).await?;
                println!("{}", serde_json::to_string(&snapshot)?);
                Ok(())
            }
            Command::Simulate { script, horizon_ms } => {
                run_simulation(&settings, &script, horizon_ms).await
            }
        }
    });

    // A pending stdin read sits on a blocking thread that cannot be cancelled.
    runtime.shutdown_background();
    outcome
}

/// Runs one realtime session fed by `source`. Returns the final snapshot as
/// soon as the session ends or the source runs dry, whichever comes first.
async fn play<S>(settings: &Settings, auto_start: bool, mut source: S) -> Result<SessionSnapshot>
where
    S: InputSource + 'static,
{
    let (handle, task) = launch(settings.host_settings());
    let mut events = handle.subscribe_events();
    info!(
        pointer_release = settings.pointer_release.as_str(),
        "play: host launched"
    );

    if auto_start {
        handle.start().await?;
    }

    let mut input = tokio::spawn({
        let handle = handle.clone();
        async move { pump(&mut source, &handle).await }
    });

    tokio::select! {
        forwarded = &mut input => {
            let forwarded = forwarded.context("input task failed")??;
            info!(forwarded, "play: input closed");
        }
        final_score = print_events(&mut events) => {
            if let Some(final_score) = final_score? {
                info!(final_score, "play: session over");
            }
        }
    }
    input.abort();

    let snapshot = handle.snapshot().await?;
    handle.shutdown().await?;
    task.await.context("host task failed")?;
    Ok(snapshot)
}

/// Echoes events as JSON lines until a session ends or the host goes away.
async fn print_events(events: &mut broadcast::Receiver<GameEvent>) -> Result<Option<u64>> {
    loop {
        match events.recv().await {
            Ok(event) => {
                println!("{}", serde_json::to_string(&event)?);
                if let GameEvent::SessionEnded { final_score } = event {
                    return Ok(Some(final_score));
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "play: event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return Ok(None),
        }
    }
}

async fn run_simulation(settings: &Settings, script: &Path, horizon_ms: Option<u64>) -> Result<()> {
    let raw = tokio::fs::read_to_string(script)
        .await
        .with_context(|| format!("failed to read script '{}'", script.display()))?;
    let steps = parse_script(&raw)
        .with_context(|| format!("failed to parse script '{}'", script.display()))?;

    let report = simulate(&steps, settings.pointer_release, horizon_ms.map(Timestamp));
    info!(
        steps = steps.len(),
        score = report.snapshot.score,
        finished_at_ms = report.finished_at_ms,
        "simulate: finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
