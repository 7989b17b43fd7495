//! N-player minimax search
//!
//! The searching player maximises its own evaluation; every other player in
//! the rotation is assumed to minimise it. Turns advance through the rotation
//! in seat order, wrapping around.

use crate::board::Color;
use crate::eval::{evaluate, Heuristics, LOSS_SCORE, WIN_SCORE};
use crate::layout::Layout;
use crate::movegen::Move;
use crate::state::GameState;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Highest accepted difficulty
pub const MAX_DIFFICULTY: u8 = 4;

/// Difficulty a new game starts with
pub const DEFAULT_DIFFICULTY: u8 = 1;

/// Search depth (plies) for a difficulty level
pub fn depth_for_difficulty(difficulty: u8) -> u32 {
    u32::from(difficulty.clamp(1, MAX_DIFFICULTY))
}

// ============================================================================
// SELECTION
// ============================================================================

/// Result of a search: the chosen immediate successor
#[derive(Clone, Debug)]
pub struct Selection {
    /// Successor state (or the input state when nothing was played)
    pub state: GameState,
    /// Move leading to `state`; `None` when the node was terminal or a pass
    pub mv: Option<Move>,
    /// Backed-up evaluation of the chosen line for the searching player
    pub value: i32,
}

impl Selection {
    fn unchanged(state: &GameState, value: i32) -> Self {
        Self {
            state: state.clone(),
            mv: None,
            value,
        }
    }
}

// ============================================================================
// MINIMAX AI
// ============================================================================

/// Plain minimax player (no pruning, no tables)
pub struct MinimaxAI<'a> {
    pub depth: u32,
    pub heuristics: Heuristics,
    layout: &'a Layout,
}

impl<'a> MinimaxAI<'a> {
    pub fn new(depth: u32, layout: &'a Layout) -> Self {
        Self {
            depth,
            heuristics: Heuristics::default(),
            layout,
        }
    }

    pub fn for_difficulty(difficulty: u8, layout: &'a Layout) -> Self {
        Self::new(depth_for_difficulty(difficulty), layout)
    }

    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Evaluate a state for one player
    pub fn evaluate(&self, state: &GameState, player: Color) -> i32 {
        evaluate(state, player, self.layout, &self.heuristics)
    }

    /// Pick a move for `player`, who must be part of `rotation`
    ///
    /// Returns `None` when the player is not seated or has to pass.
    pub fn best_move(&self, state: &GameState, player: Color, rotation: &[Color]) -> Option<Selection> {
        let mover_index = rotation.iter().position(|&c| c == player)?;
        let selection = self.select(state, player, rotation, mover_index, self.depth, true);

        tracing::debug!(
            "{} searched depth {}: value={} move={:?}",
            player,
            self.depth,
            selection.value,
            selection.mv.as_ref().map(|m| (m.from, m.to))
        );

        selection.mv.is_some().then_some(selection)
    }

    /// Recursive minimax step
    ///
    /// Maximising layers move `player`; minimising layers move
    /// `rotation[mover_index]`. Ties keep the earliest child.
    pub fn select(
        &self,
        state: &GameState,
        player: Color,
        rotation: &[Color],
        mover_index: usize,
        depth: u32,
        maximizing: bool,
    ) -> Selection {
        let value = self.evaluate(state, player);
        if depth == 0 || value == WIN_SCORE || value == LOSS_SCORE || rotation.is_empty() {
            return Selection::unchanged(state, value);
        }

        let mover_index = mover_index % rotation.len();
        let mover = if maximizing { player } else { rotation[mover_index] };

        let mut children = state.expand(mover);
        if children.is_empty() {
            return Selection::unchanged(state, value);
        }

        let next_index = (mover_index + 1) % rotation.len();
        let next_maximizing = rotation[next_index] == player;

        let mut best: Option<(usize, i32)> = None;
        for (i, child) in children.iter().enumerate() {
            let reply = self.select(
                &child.state,
                player,
                rotation,
                next_index,
                depth - 1,
                next_maximizing,
            );

            let improves = match best {
                None => true,
                Some((_, best_value)) if maximizing => reply.value > best_value,
                Some((_, best_value)) => reply.value < best_value,
            };
            if improves {
                best = Some((i, reply.value));
            }
        }

        let Some((i, value)) = best else {
            return Selection::unchanged(state, value);
        };
        let chosen = children.swap_remove(i);
        Selection {
            state: chosen.state,
            mv: Some(chosen.mv),
            value,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
