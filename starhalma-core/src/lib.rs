//! Star Halma Core - Game engine and AI
//!
//! This crate provides the core game logic for Star Halma (Chinese checkers):
//! - Board geometry (six-pointed star on a skewed axial grid)
//! - Seats, piece counts and home clusters per player count
//! - Step and jump-chain move generation
//! - Position evaluation and N-player minimax search
//! - A live game with turn rotation, listeners and JSON persistence

pub mod ai;
pub mod board;
pub mod error;
pub mod eval;
pub mod game;
pub mod layout;
pub mod movegen;
pub mod state;

// Re-exports for convenient access
pub use ai::{depth_for_difficulty, MinimaxAI, Selection, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
pub use board::{Board, Cell, Color, Position, BOARD_MAX, BOARD_MIN, DIRECTIONS, PLAYABLE_CELLS};
pub use error::{Error, Result};
pub use eval::{evaluate, evaluate_board, has_finished, Heuristics, LOSS_SCORE, WIN_SCORE};
pub use game::{BoardListener, Game, GameConfig, Player};
pub use layout::Layout;
pub use movegen::{legal_destinations, legal_moves, Move, MoveKind};
pub use state::{Child, GameState};
