//! Text renderer for the mood tracker.

use std::{fs, path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::TryRecvError;

use moodlog::{
    clock::SystemClock,
    config::AppConfig,
    intent::Intent,
    logging,
    persist::sqlite::SqliteEntryStore,
    runtime::{
        events::TrackerEvent,
        handle::spawn_tracker,
    },
    state::StateSnapshot,
    types::Mood,
};

#[derive(Debug, Parser)]
#[command(name = "moodlog", about = "Record moods and replay the history")]
struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a mood from 1 (awful) to 5 (great).
    Log { mood: i32 },
    /// Show recorded moods, newest first.
    History {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// List the selectable moods.
    Moods,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init_tracing(&config.log_filter);

    if let Command::Moods = cli.command {
        for mood in Mood::ALL {
            println!("{mood}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let db_path = cli
        .db
        .or_else(|| config.resolved_db_path())
        .ok_or("no database path configured and no data directory available")?;
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let store = SqliteEntryStore::open(&db_path)?;
    let handle = spawn_tracker(Arc::new(store), Arc::new(SystemClock), config.tracker.clone());
    let mut events = handle.subscribe_events();

    let mut ok = true;
    match cli.command {
        Command::Log { mood } => {
            handle.settled().await?;
            handle.handle_intent(Intent::SaveMood(mood))?;
            let snapshot = handle.settled().await?;
            ok &= report_events(&mut events);
            render(&snapshot, Some(5));
        }
        Command::History { limit, json } => {
            let snapshot = handle.settled().await?;
            ok &= report_events(&mut events);
            if json {
                println!("{}", serde_json::to_string_pretty(&*snapshot)?);
            } else {
                render(&snapshot, limit);
            }
        }
        Command::Moods => {}
    }

    handle.shutdown().await?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn report_events(events: &mut tokio::sync::broadcast::Receiver<TrackerEvent>) -> bool {
    let mut ok = true;
    loop {
        match events.try_recv() {
            Ok(TrackerEvent::Failed(err)) => {
                eprintln!("warning: {err}");
                ok = false;
            }
            Ok(TrackerEvent::EntrySaved { id, mood }) => println!("saved #{id}: {mood}"),
            Ok(TrackerEvent::RefreshDiscarded { .. }) => {}
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    ok
}

fn render(snapshot: &StateSnapshot, limit: Option<usize>) {
    if snapshot.entries.is_empty() {
        println!("no moods recorded yet");
        return;
    }
    let limit = limit.unwrap_or(usize::MAX);
    for entry in snapshot.entries.iter().take(limit) {
        println!("{:>15}  {}", entry.timestamp_ms, entry.mood);
    }
}
