//! Play command - run one game between computer seats
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_game(), play_game(), save_game(), report_results()
//! - Level 3: play_turn(), summarize()
//! - Level 4: rng and formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starhalma_core::eval::pieces_in_goal;
use starhalma_core::{BoardListener, Color, Game, GameConfig, Move, Player, Position, DEFAULT_DIFFICULTY};

use crate::show_cmd::render_board;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Number of players (2, 3, 4 or 6)
    #[arg(long, default_value = "2")]
    pub players: usize,

    /// Search depth for computer seats (1-4); defaults to 1, or the saved value
    #[arg(long)]
    pub difficulty: Option<u8>,

    /// Stop after this many turns (passes included)
    #[arg(long, default_value = "300")]
    pub max_turns: usize,

    /// Seat that plays uniformly random legal moves (repeatable)
    #[arg(long = "random", value_name = "COLOR")]
    pub random: Vec<Color>,

    /// Continue a saved game instead of starting a new one
    #[arg(long, value_name = "FILE")]
    pub resume: Option<PathBuf>,

    /// Write the game to this file when done
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// What happened during the run
#[derive(Clone, Debug, Default)]
struct GameRecord {
    turns: usize,
    moves: usize,
    jumps: usize,
    passes: usize,
}

/// Outcome of a single turn
#[derive(Clone, Debug)]
enum TurnOutcome {
    Moved(Color, Move),
    Passed(Color),
}

/// Per-seat line of the summary
#[derive(Clone, Debug)]
struct SeatSummary {
    color: Color,
    finished: bool,
    pieces_in_goal: usize,
}

/// Listener that traces every board change
struct TraceListener;

impl BoardListener for TraceListener {
    fn new_game(&mut self, players: &[Player]) {
        tracing::debug!("Board reset for {} players", players.len());
    }

    fn place_piece(&mut self, pos: Position, color: Color) {
        tracing::trace!("{} placed at {}", color, pos);
    }

    fn move_piece(&mut self, from: Position, to: Position) {
        tracing::debug!("Moved {} -> {}", from, to);
    }

    fn player_finished(&mut self, player: &Player, rank: usize) {
        tracing::info!("{} is home (rank {})", player.color, rank);
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Set up or resume the game
/// 2. Play until someone is left alone or the turn limit hits
/// 3. Save if asked
/// 4. Report results
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let mut game = setup_game(&args)?;
    game.add_listener(Box::new(TraceListener));

    tracing::info!(
        "Starting game: {} players, difficulty {}, random seats {:?}",
        game.num_players(),
        game.difficulty(),
        args.random
    );

    let mut rng = create_rng(seed);
    let record = play_game(&mut game, &args.random, args.max_turns, &mut rng);

    if let Some(path) = &args.save {
        save_game(&game, path)?;
    }

    report_results(&game, &record, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// New game from the arguments, or the saved one
fn setup_game(args: &PlayArgs) -> Result<Game> {
    let mut game = match &args.resume {
        Some(path) => Game::load(path)
            .with_context(|| format!("Failed to load game: {}", path.display()))?,
        None => {
            let config = GameConfig::new(args.players)
                .with_difficulty(args.difficulty.unwrap_or(DEFAULT_DIFFICULTY))
                .all_computer();
            Game::new(config).context("Failed to set up game")?
        }
    };

    if let Some(difficulty) = args.difficulty {
        game.set_difficulty(difficulty).context("Bad --difficulty")?;
    }

    for color in &args.random {
        if game.player(*color).is_none() {
            tracing::warn!("{} is not seated in a {}-player game", color, game.num_players());
        }
    }

    Ok(game)
}

/// Play turns until the game ends or `max_turns` is reached
fn play_game(game: &mut Game, random: &[Color], max_turns: usize, rng: &mut ChaCha8Rng) -> GameRecord {
    let mut record = GameRecord::default();

    while !game.is_over() && record.turns < max_turns {
        match play_turn(game, random, rng) {
            Some(TurnOutcome::Moved(color, mv)) => {
                tracing::debug!("{} played {} -> {}", color, mv.from, mv.to);
                record.moves += 1;
                if mv.is_jump() {
                    record.jumps += 1;
                }
            }
            Some(TurnOutcome::Passed(color)) => {
                tracing::debug!("{} has no moves", color);
                record.passes += 1;
            }
            None => break,
        }
        record.turns += 1;
    }

    if !game.is_over() {
        tracing::info!("Stopped after {} turns", record.turns);
    }

    record
}

fn save_game(game: &Game, path: &Path) -> Result<()> {
    game.save(path)
        .with_context(|| format!("Failed to save game: {}", path.display()))?;
    tracing::info!("Saved game to {}", path.display());
    Ok(())
}

/// Report game results
fn report_results(game: &Game, record: &GameRecord, json: bool) {
    if json {
        print_json_results(game, record);
    } else {
        print_text_results(game, record);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Let the current player act: random seats pick any legal move, the rest search
fn play_turn(game: &mut Game, random: &[Color], rng: &mut ChaCha8Rng) -> Option<TurnOutcome> {
    let color = game.current_player()?;

    if random.contains(&color) {
        let moves = game.legal_moves_for(color);
        if let Some(mv) = moves.choose(rng) {
            if game.play_move(mv) {
                return Some(TurnOutcome::Moved(color, mv.clone()));
            }
        }
        game.pass();
        return Some(TurnOutcome::Passed(color));
    }

    Some(match game.make_move() {
        Some(mv) => TurnOutcome::Moved(color, mv),
        None => TurnOutcome::Passed(color),
    })
}

/// Seat lines in seat order
fn summarize(game: &Game) -> Vec<SeatSummary> {
    game.players()
        .iter()
        .map(|player| SeatSummary {
            color: player.color,
            finished: !player.active,
            pieces_in_goal: pieces_in_goal(game.board(), player.color, game.layout()),
        })
        .collect()
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Print results as JSON
fn print_json_results(game: &Game, record: &GameRecord) {
    #[derive(serde::Serialize)]
    struct JsonSeat {
        color: String,
        finished: bool,
        pieces_in_goal: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        players: usize,
        pieces_per_player: usize,
        difficulty: u8,
        turns: usize,
        moves: usize,
        jumps: usize,
        passes: usize,
        game_over: bool,
        ranking: Vec<String>,
        seats: Vec<JsonSeat>,
    }

    let output = JsonOutput {
        players: game.num_players(),
        pieces_per_player: game.num_pieces(),
        difficulty: game.difficulty(),
        turns: record.turns,
        moves: record.moves,
        jumps: record.jumps,
        passes: record.passes,
        game_over: game.is_over(),
        ranking: game.ranking().iter().map(|c| c.to_string()).collect(),
        seats: summarize(game)
            .into_iter()
            .map(|s| JsonSeat {
                color: s.color.to_string(),
                finished: s.finished,
                pieces_in_goal: s.pieces_in_goal,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(game: &Game, record: &GameRecord) {
    println!("{}", render_board(game.board()));

    println!("=== Game Results ===");
    println!("Players:     {}", game.num_players());
    println!("Turns:       {}", record.turns);
    println!(
        "Moves:       {} ({} jumps, {} passes)",
        record.moves, record.jumps, record.passes
    );
    println!("Game over:   {}", if game.is_over() { "yes" } else { "no" });

    println!("\nStandings:");
    for (place, color) in game.standings().iter().enumerate() {
        println!("  {}. {}", place + 1, color);
    }

    println!("\nSeats:");
    for seat in summarize(game) {
        println!(
            "  {:<8} {:>2}/{} home{}",
            seat.color,
            seat.pieces_in_goal,
            game.num_pieces(),
            if seat.finished { " (finished)" } else { "" }
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
