//! Show command - print a board as text

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use starhalma_core::{Board, Cell, Game, GameConfig, Position, BOARD_MAX, BOARD_MIN};

#[derive(Args)]
pub struct ShowArgs {
    /// Player count for a starting position
    #[arg(long, default_value = "6", conflicts_with = "file")]
    pub players: usize,

    /// Saved game to print instead
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let game = match &args.file {
        Some(path) => Game::load(path)
            .with_context(|| format!("Failed to load game: {}", path.display()))?,
        None => Game::new(GameConfig::new(args.players).all_computer())
            .with_context(|| format!("Cannot set up a {}-player game", args.players))?,
    };

    print!("{}", render_board(game.board()));
    Ok(())
}

/// Screen column of a cell; the star spans columns 0..=24
fn column(x: i8, y: i8) -> usize {
    (2 * i32::from(x) + i32::from(y) + 12) as usize
}

/// First letter of the color, `.` for empty cells
fn symbol(cell: Cell) -> Option<char> {
    match cell {
        Cell::Invalid => None,
        Cell::Empty => Some('.'),
        Cell::Occupied(color) => color.name().chars().next().map(|c| c.to_ascii_uppercase()),
    }
}

/// Draw the star with +y at the top
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    for y in (BOARD_MIN..=BOARD_MAX).rev() {
        let mut line = vec![' '; 25];
        for x in BOARD_MIN..=BOARD_MAX {
            let Some(c) = symbol(board.classify(Position::new(x, y))) else {
                continue;
            };
            if let Some(slot) = line.get_mut(column(x, y)) {
                *slot = c;
            }
        }
        let row: String = line.into_iter().collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}
