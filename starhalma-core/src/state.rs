//! Immutable board snapshots used as search-tree nodes

use crate::board::{Board, Cell, Color, Position};
use crate::movegen::{legal_moves, Move};

/// A frozen copy of every cell on the board
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
}

/// A successor state together with the move that produced it
#[derive(Clone, Debug)]
pub struct Child {
    pub mv: Move,
    pub state: GameState,
}

impl GameState {
    /// Snapshot a live board (deep copy)
    pub fn from_board(board: &Board) -> Self {
        Self {
            board: board.clone(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn classify(&self, pos: Position) -> Cell {
        self.board.classify(pos)
    }

    /// One child per (piece, destination) pair available to `color`
    ///
    /// Pieces are visited in board order; for each piece jump chains come
    /// before steps. Every child owns its own copy of the board.
    pub fn expand(&self, color: Color) -> Vec<Child> {
        let mut children = Vec::new();

        for from in self.board.pieces(color) {
            for mv in legal_moves(&self.board, from) {
                let mut board = self.board.clone();
                match board.relocate(mv.from, mv.to) {
                    Ok(_) => children.push(Child {
                        mv,
                        state: GameState { board },
                    }),
                    Err(e) => {
                        tracing::warn!("Skipping generated move {} -> {}: {}", mv.from, mv.to, e);
                    }
                }
            }
        }

        children
    }

    /// Apply a move to a copy of this state
    pub fn apply(&self, mv: &Move) -> Option<GameState> {
        let mut board = self.board.clone();
        board.relocate(mv.from, mv.to).ok()?;
        Some(GameState { board })
    }
}

impl From<GameState> for Board {
    fn from(state: GameState) -> Self {
        state.board
    }
}
