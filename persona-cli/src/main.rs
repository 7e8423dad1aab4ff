use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use persona_lib::{
    CoreConfig, FileState, MemoryState, Persistence, ProfileStore, Synchronizer, SystemRunner,
};
use sysexits::ExitCode;
use tracing::{Level, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod picker;
mod profile;
mod render;

#[derive(Parser, Debug)]
#[command(name = "persona")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Override the file profiles are stored in
    #[arg(short, long, global = true)]
    state: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Switch, add and delete profiles interactively (the default)
    Pick,
    /// Add a new profile through prompts
    Configure,
    /// Show the active identity and registry
    Status,
    /// Operate on stored profiles without prompts
    #[command(subcommand)]
    Profile(profile::Command),
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging goes to stderr so it never mixes with command output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {err}");
    }

    let cli = Cli::parse();
    let cfg = CoreConfig::load();

    let state_file = match cli.state.clone() {
        Some(path) => Ok(path),
        None => cfg.state_file(),
    };
    let persistence: Arc<dyn Persistence> = match state_file {
        Ok(path) => Arc::new(FileState::new(path)),
        Err(err) => {
            warn!("Profiles will not be saved: {err}");
            Arc::new(MemoryState::new())
        }
    };

    let store = ProfileStore::init(persistence);
    let sync = Synchronizer::new(store, Arc::new(SystemRunner), cfg.tools.clone());

    match cli.command.unwrap_or(Command::Pick) {
        Command::Pick => picker::open(&sync),
        Command::Configure => picker::configure(&sync),
        Command::Status => {
            render::status(&sync.summary(&sync.query_active()));
            ExitCode::Ok
        }
        Command::Profile(cmd) => profile::handle(&sync, &cmd),
    }
}
