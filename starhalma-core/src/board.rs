//! Star board geometry with skewed axial coordinates
//!
//! The board is a 17x17 square of cells addressed by `x, y` in `-8..=8`.
//! The y axis runs at 60° to the x axis, so the six neighbours of a cell
//! are the offsets in [`DIRECTIONS`]. Cells outside the six-pointed star are
//! permanently [`Cell::Invalid`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest coordinate on either axis
pub const BOARD_MIN: i8 = -8;
/// Highest coordinate on either axis
pub const BOARD_MAX: i8 = 8;
/// Cells per axis
pub const BOARD_SPAN: usize = (BOARD_MAX - BOARD_MIN + 1) as usize;
/// Total addressable cells, playable or not
pub const CELL_COUNT: usize = BOARD_SPAN * BOARD_SPAN;
/// Cells inside the star
pub const PLAYABLE_CELLS: usize = 121;

/// Neighbour offsets (dx, dy) on the skewed grid
pub const DIRECTIONS: [(i8, i8); 6] = [
    (1, 0),   // +x
    (-1, 0),  // -x
    (-1, 1),  // -x, +y
    (1, -1),  // +x, -y
    (0, 1),   // +y
    (0, -1),  // -y
];

/// Rectangles (x range, y range) cut away from the square
const INVALID_REGIONS: [((i8, i8), (i8, i8)); 6] = [
    ((-8, -5), (5, 8)),   // top left
    ((0, 8), (5, 8)),     // top right
    ((5, 8), (0, 4)),     // right
    ((5, 8), (-8, -5)),   // bottom right
    ((-8, 0), (-8, -5)),  // bottom left
    ((-8, -5), (-4, 0)),  // left
];

/// Triangular trims next to four of the star points
const INVALID_CORNERS: [(i8, i8); 24] = [
    // top
    (-3, 8), (-2, 7), (-2, 8), (-1, 6), (-1, 7), (-1, 8),
    // right
    (6, -1), (7, -1), (7, -2), (8, -1), (8, -2), (8, -3),
    // bottom
    (1, -6), (1, -7), (1, -8), (2, -7), (2, -8), (3, -8),
    // left
    (-8, 3), (-8, 2), (-8, 1), (-7, 2), (-7, 1), (-6, 1),
];

// ============================================================================
// POSITION
// ============================================================================

/// A cell address on the board
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Check if this position lies in the addressable square
    pub fn in_bounds(&self) -> bool {
        (BOARD_MIN..=BOARD_MAX).contains(&self.x) && (BOARD_MIN..=BOARD_MAX).contains(&self.y)
    }

    /// Position shifted by a direction vector
    ///
    /// Saturates at the `i8` limits; such positions are never in bounds.
    pub fn offset(&self, (dx, dy): (i8, i8)) -> Position {
        Position::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Euclidean distance in raw (skewed) coordinates
    ///
    /// Not a hex step count; the evaluator only needs a monotone proxy.
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = f32::from(self.x) - f32::from(other.x);
        let dy = f32::from(self.y) - f32::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    fn index(&self) -> Option<usize> {
        if !self.in_bounds() {
            return None;
        }
        let col = (self.x - BOARD_MIN) as usize;
        let row = (self.y - BOARD_MIN) as usize;
        Some(col * BOARD_SPAN + row)
    }

    fn from_index(index: usize) -> Position {
        let col = (index / BOARD_SPAN) as i8;
        let row = (index % BOARD_SPAN) as i8;
        Position::new(col + BOARD_MIN, row + BOARD_MIN)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ============================================================================
// COLOR AND CELL
// ============================================================================

/// Piece color; each color owns one star point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red = 0,
    Yellow = 1,
    Green = 2,
    Cyan = 3,
    Blue = 4,
    Magenta = 5,
}

impl Color {
    /// All colors, clockwise from the top point
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Magenta,
    ];

    /// Color on the diametrically opposite point
    pub fn opposite(self) -> Color {
        match self {
            Color::Red => Color::Cyan,
            Color::Cyan => Color::Red,
            Color::Yellow => Color::Blue,
            Color::Blue => Color::Yellow,
            Color::Green => Color::Magenta,
            Color::Magenta => Color::Green,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Color::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| format!("unknown color: {}", s))
    }
}

/// Classification of a single cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Invalid,
    Occupied(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Cell::Occupied(_))
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Occupied(c) => Some(*c),
            _ => None,
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// The playing surface (clone for an independent deep copy)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty star: every playable cell empty, the rest invalid
    pub fn new() -> Self {
        let mut cells = vec![Cell::Empty; CELL_COUNT];

        for ((x_lo, x_hi), (y_lo, y_hi)) in INVALID_REGIONS {
            for x in x_lo..=x_hi {
                for y in y_lo..=y_hi {
                    if let Some(i) = Position::new(x, y).index() {
                        cells[i] = Cell::Invalid;
                    }
                }
            }
        }

        for (x, y) in INVALID_CORNERS {
            if let Some(i) = Position::new(x, y).index() {
                cells[i] = Cell::Invalid;
            }
        }

        Self { cells }
    }

    /// Classify a cell; anything off the board reads as `Invalid`
    pub fn classify(&self, pos: Position) -> Cell {
        pos.index().map_or(Cell::Invalid, |i| self.cells[i])
    }

    /// Classify a cell, reporting out-of-range positions
    pub fn try_classify(&self, pos: Position) -> Result<Cell> {
        pos.index()
            .map(|i| self.cells[i])
            .ok_or(Error::OutOfRange(pos))
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.classify(pos).is_empty()
    }

    pub fn is_playable(&self, pos: Position) -> bool {
        self.classify(pos) != Cell::Invalid
    }

    /// Put a piece on a playable cell, replacing whatever was there
    pub fn place(&mut self, pos: Position, color: Color) -> Result<()> {
        let i = self.playable_index(pos)?;
        self.cells[i] = Cell::Occupied(color);
        Ok(())
    }

    /// Empty a playable cell
    pub fn clear(&mut self, pos: Position) -> Result<()> {
        let i = self.playable_index(pos)?;
        self.cells[i] = Cell::Empty;
        Ok(())
    }

    /// Move the piece at `from` to `to` without checking the rules
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<Color> {
        let color = self
            .try_classify(from)?
            .color()
            .ok_or(Error::NoPiece(from))?;
        self.place(to, color)?;
        self.clear(from)?;
        Ok(color)
    }

    /// The six adjacent positions (some may be off the board)
    pub fn neighbors(pos: Position) -> [Position; 6] {
        DIRECTIONS.map(|dir| pos.offset(dir))
    }

    /// Every addressable position, x-major
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT).map(Position::from_index)
    }

    /// Iterate occupied cells
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Color)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.color().map(|c| (Position::from_index(i), c)))
    }

    /// Positions holding pieces of one color
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = Position> + '_ {
        self.occupied()
            .filter(move |&(_, c)| c == color)
            .map(|(pos, _)| pos)
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces(color).count()
    }

    pub fn playable_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Invalid).count()
    }

    fn playable_index(&self, pos: Position) -> Result<usize> {
        let i = pos.index().ok_or(Error::OutOfRange(pos))?;
        if self.cells[i] == Cell::Invalid {
            return Err(Error::InvalidCell(pos));
        }
        Ok(i)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for Vec<Cell> {
    fn from(board: Board) -> Self {
        board.cells
    }
}

impl TryFrom<Vec<Cell>> for Board {
    type Error = Error;

    /// Rebuild a board, rejecting anything that does not have the star shape
    fn try_from(cells: Vec<Cell>) -> Result<Self> {
        if cells.len() != CELL_COUNT {
            return Err(Error::CorruptSave(format!(
                "expected {} cells, found {}",
                CELL_COUNT,
                cells.len()
            )));
        }

        let star = Board::new();
        for (i, (cell, reference)) in cells.iter().zip(&star.cells).enumerate() {
            if (*cell == Cell::Invalid) != (*reference == Cell::Invalid) {
                return Err(Error::CorruptSave(format!(
                    "cell {} does not match the star shape",
                    Position::from_index(i)
                )));
            }
        }

        Ok(Self { cells })
    }
}
