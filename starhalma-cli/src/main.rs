//! Star Halma CLI - Command-line interface
//!
//! Commands:
//! - play: Run a computer game, optionally resuming from a save
//! - show: Print a starting position or a saved board

mod play_cmd;
mod show_cmd;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "starhalma")]
#[command(about = "Star Halma (Chinese checkers) engine", version)]
struct Cli {
    /// Seed for the random seats (reproducible games)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game between computer seats
    Play(play_cmd::PlayArgs),
    /// Print a board
    Show(show_cmd::ShowArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Show(args) => show_cmd::run(args),
    }
}

/// Logs go to stderr so `--json` output stays clean
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
