//! Layout - seats, piece counts and home clusters for a player count

use rustc_hash::FxHashMap;

use crate::board::{Color, Position};
use crate::error::{Error, Result};

// ============================================================================
// TABLES
// ============================================================================

/// Supported player counts with pieces per player and seat colors
const CONFIGURATIONS: [(usize, usize, &[Color]); 4] = [
    (2, 15, &[Color::Red, Color::Cyan]),
    (3, 10, &[Color::Red, Color::Green, Color::Blue]),
    (4, 10, &[Color::Red, Color::Yellow, Color::Cyan, Color::Blue]),
    (
        6,
        10,
        &[
            Color::Red,
            Color::Yellow,
            Color::Green,
            Color::Cyan,
            Color::Blue,
            Color::Magenta,
        ],
    ),
];

/// Extra front row for Red in two-player games (listed before the triangle)
const RED_FRONT_ROW: [(i8, i8); 5] = [(-4, 4), (-3, 4), (-2, 4), (-1, 4), (0, 4)];
const CYAN_FRONT_ROW: [(i8, i8); 5] = [(0, -4), (1, -4), (2, -4), (3, -4), (4, -4)];

/// Ten-cell triangles; the first entry is the back corner of the point
const TRIANGLES: [(Color, [(i8, i8); 10]); 6] = [
    (
        Color::Red,
        [(-4, 8), (-4, 7), (-4, 6), (-4, 5), (-3, 7), (-3, 6), (-3, 5), (-2, 6), (-2, 5), (-1, 5)],
    ),
    (
        Color::Yellow,
        [(4, 1), (4, 2), (4, 3), (4, 4), (3, 2), (3, 3), (3, 4), (2, 3), (2, 4), (1, 4)],
    ),
    (
        Color::Green,
        [(5, -1), (5, -2), (5, -3), (5, -4), (6, -2), (6, -3), (6, -4), (7, -4), (7, -3), (8, -4)],
    ),
    (
        Color::Cyan,
        [(4, -8), (4, -7), (4, -6), (4, -5), (3, -7), (3, -6), (3, -5), (2, -6), (2, -5), (1, -5)],
    ),
    (
        Color::Blue,
        [(-4, -1), (-4, -2), (-4, -3), (-4, -4), (-3, -2), (-3, -3), (-3, -4), (-2, -3), (-2, -4), (-1, -4)],
    ),
    (
        Color::Magenta,
        [(-5, 1), (-5, 2), (-5, 3), (-5, 4), (-6, 2), (-6, 3), (-6, 4), (-7, 3), (-7, 4), (-8, 4)],
    ),
];

fn configuration(num_players: usize) -> Result<(usize, &'static [Color])> {
    CONFIGURATIONS
        .iter()
        .find(|(n, _, _)| *n == num_players)
        .map(|&(_, pieces, seats)| (pieces, seats))
        .ok_or(Error::UnsupportedPlayerCount(num_players))
}

/// Pieces each player gets for a player count
pub fn pieces_for(num_players: usize) -> Result<usize> {
    configuration(num_players).map(|(pieces, _)| pieces)
}

/// Seat colors, in turn order, for a player count
pub fn seats_for(num_players: usize) -> Result<&'static [Color]> {
    configuration(num_players).map(|(_, seats)| seats)
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Derived, per-game geometry: who sits where and which cells are whose home
#[derive(Clone, Debug)]
pub struct Layout {
    num_players: usize,
    num_pieces: usize,
    seats: &'static [Color],
    homes: FxHashMap<Color, Vec<Position>>,
    home_owner: FxHashMap<Position, Color>,
}

impl Layout {
    pub fn new(num_players: usize) -> Result<Self> {
        let (num_pieces, seats) = configuration(num_players)?;

        let mut homes = FxHashMap::default();
        let mut home_owner = FxHashMap::default();

        for (color, triangle) in TRIANGLES {
            let front_row: &[(i8, i8)] = match (color, num_players) {
                (Color::Red, 2) => &RED_FRONT_ROW,
                (Color::Cyan, 2) => &CYAN_FRONT_ROW,
                _ => &[],
            };

            let cells: Vec<Position> = front_row
                .iter()
                .chain(triangle.iter())
                .map(|&(x, y)| Position::new(x, y))
                .collect();

            for &pos in &cells {
                home_owner.insert(pos, color);
            }
            homes.insert(color, cells);
        }

        Ok(Self {
            num_players,
            num_pieces,
            seats,
            homes,
            home_owner,
        })
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn num_pieces(&self) -> usize {
        self.num_pieces
    }

    /// Seated colors in turn order
    pub fn seats(&self) -> &'static [Color] {
        self.seats
    }

    /// Starting cluster of a color
    pub fn home(&self, color: Color) -> &[Position] {
        self.homes.get(&color).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cells a color must fill to finish
    pub fn goal(&self, color: Color) -> &[Position] {
        self.home(color.opposite())
    }

    /// First listed home cell
    pub fn back_cell(&self, color: Color) -> Option<Position> {
        self.home(color).first().copied()
    }

    pub fn is_goal(&self, color: Color, pos: Position) -> bool {
        self.home_owner(pos) == Some(color.opposite())
    }

    /// Color whose home contains `pos`, if any
    pub fn home_owner(&self, pos: Position) -> Option<Color> {
        self.home_owner.get(&pos).copied()
    }

    /// True when `pos` belongs to the goal of any color other than `color`
    pub fn in_foreign_goal(&self, color: Color, pos: Position) -> bool {
        matches!(self.home_owner(pos), Some(owner) if owner != color.opposite())
    }
}
