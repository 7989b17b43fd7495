//! Move generation: single steps and recursive jump chains
//!
//! A turn is either one step to an adjacent empty cell or one jump chain:
//! hop over any occupied neighbour into the empty cell beyond, optionally
//! repeated from each landing. The two kinds are never combined.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Position, DIRECTIONS};

/// How a piece got from `from` to `to`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Step,
    Jump,
}

/// A complete move for one piece
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub kind: MoveKind,
    /// Every cell the piece lands on, in order; ends with `to`
    pub path: Vec<Position>,
}

impl Move {
    pub fn step(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Step,
            path: vec![to],
        }
    }

    pub fn is_jump(&self) -> bool {
        self.kind == MoveKind::Jump
    }
}

/// Add every empty neighbour of `pos` to `moves` (no duplicates)
pub fn step_moves(board: &Board, pos: Position, moves: &mut Vec<Position>) {
    for next in Board::neighbors(pos) {
        if board.is_empty(next) && !moves.contains(&next) {
            moves.push(next);
        }
    }
}

/// Add every landing reachable by a jump chain from `pos` to `landings`
///
/// Cells already present in `landings` count as visited and are never
/// expanded again.
pub fn jump_moves(board: &Board, pos: Position, landings: &mut Vec<Position>) {
    let mut parents = vec![None; landings.len()];
    walk_jumps(board, pos, None, landings, &mut parents);
}

/// Depth-first jump search. `parents[i]` is the index of the landing that
/// `landings[i]` was reached from (`None` for the first hop).
fn walk_jumps(
    board: &Board,
    pos: Position,
    parent: Option<usize>,
    landings: &mut Vec<Position>,
    parents: &mut Vec<Option<usize>>,
) {
    for dir in DIRECTIONS {
        let over = pos.offset(dir);
        if !board.classify(over).is_occupied() {
            continue;
        }

        let landing = over.offset(dir);
        if !board.is_empty(landing) || landings.contains(&landing) {
            continue;
        }

        landings.push(landing);
        parents.push(parent);
        let index = landings.len() - 1;
        walk_jumps(board, landing, Some(index), landings, parents);
    }
}

/// Destinations for the piece at `from`: jump landings first, then steps
pub fn legal_destinations(board: &Board, from: Position) -> Vec<Position> {
    if !board.classify(from).is_occupied() {
        return vec![];
    }

    let mut destinations = Vec::new();
    jump_moves(board, from, &mut destinations);
    step_moves(board, from, &mut destinations);
    destinations
}

/// Full move descriptors for the piece at `from`, jump chains first
pub fn legal_moves(board: &Board, from: Position) -> Vec<Move> {
    if !board.classify(from).is_occupied() {
        return vec![];
    }

    let mut landings = Vec::new();
    let mut parents = Vec::new();
    walk_jumps(board, from, None, &mut landings, &mut parents);

    let mut moves: Vec<Move> = landings
        .iter()
        .enumerate()
        .map(|(i, &to)| Move {
            from,
            to,
            kind: MoveKind::Jump,
            path: chain_to(i, &landings, &parents),
        })
        .collect();

    let mut steps = Vec::new();
    step_moves(board, from, &mut steps);
    moves.extend(steps.into_iter().map(|to| Move::step(from, to)));

    moves
}

fn chain_to(index: usize, landings: &[Position], parents: &[Option<usize>]) -> Vec<Position> {
    let mut path = vec![landings[index]];
    let mut current = parents[index];
    while let Some(i) = current {
        path.push(landings[i]);
        current = parents[i];
    }
    path.reverse();
    path
}
