//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Position};
use crate::layout::Layout;
use crate::state::GameState;

/// Score of a finished player (doubles as the search's terminal marker)
pub const WIN_SCORE: i32 = i32::MAX;

/// Reserved loss marker; `evaluate` never produces it on its own
pub const LOSS_SCORE: i32 = i32::MIN;

/// round(√3): the y axis leans, so the goal reference point sits one cell
/// diagonally off the goal's back corner
const TILT: i8 = 1;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heuristics {
    /// Numerator of the per-piece closeness term `proximity / (d + 1)`
    pub proximity: f32,
    /// Bonus for each piece already inside the goal
    pub goal_bonus: i32,
    /// Penalty while a piece still sits on its own back corner
    pub back_piece_penalty: i32,
    /// Penalty for parking inside another color's goal
    pub foreign_goal_penalty: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            proximity: 1000.0,
            goal_bonus: 5000,
            back_piece_penalty: 1000,
            foreign_goal_penalty: 1000,
        }
    }
}

/// Reference point pieces of `color` are pulled towards
pub fn goal_position(color: Color, layout: &Layout) -> Option<Position> {
    let corner = layout.goal(color).first()?;
    let tilt = match color {
        Color::Green | Color::Yellow => -TILT,
        _ => TILT,
    };
    Some(corner.offset((tilt, tilt)))
}

/// Number of `color` pieces standing in its goal
pub fn pieces_in_goal(board: &Board, color: Color, layout: &Layout) -> usize {
    board
        .pieces(color)
        .filter(|&pos| layout.is_goal(color, pos))
        .count()
}

/// True once every goal cell holds one of the player's pieces
pub fn has_finished(board: &Board, color: Color, layout: &Layout) -> bool {
    pieces_in_goal(board, color, layout) == layout.num_pieces()
}

/// Evaluate a snapshot from `color`'s point of view
pub fn evaluate(state: &GameState, color: Color, layout: &Layout, heuristics: &Heuristics) -> i32 {
    evaluate_board(state.board(), color, layout, heuristics)
}

/// Evaluate a board from `color`'s point of view
///
/// Returns [`WIN_SCORE`] when the goal is full, otherwise a sum over the
/// player's pieces; higher is better.
pub fn evaluate_board(board: &Board, color: Color, layout: &Layout, heuristics: &Heuristics) -> i32 {
    let Some(target) = goal_position(color, layout) else {
        return 0;
    };
    let back_cell = layout.back_cell(color);

    let mut score = 0i32;
    let mut in_goal = 0usize;

    for pos in board.pieces(color) {
        let distance = pos.distance_to(target);

        if Some(pos) == back_cell {
            score -= heuristics.back_piece_penalty;
        }

        score += (heuristics.proximity / (distance + 1.0)) as i32;

        if layout.is_goal(color, pos) {
            score += heuristics.goal_bonus;
            in_goal += 1;
        }

        if layout.in_foreign_goal(color, pos) {
            score -= heuristics.foreign_goal_penalty;
        }

        score -= distance as i32;
    }

    if in_goal == layout.num_pieces() {
        return WIN_SCORE;
    }

    score
}
