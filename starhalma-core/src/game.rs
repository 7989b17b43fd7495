//! Live game: seats, turn order, rule checks, listeners and persistence

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::{MinimaxAI, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
use crate::board::{Board, Cell, Color, Position};
use crate::error::{Error, Result};
use crate::eval::{has_finished, Heuristics};
use crate::layout::Layout;
use crate::movegen::{legal_destinations, legal_moves, Move};
use crate::state::GameState;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A seat at the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: Color,
    pub human: bool,
    /// False once every piece has reached the goal
    pub active: bool,
}

impl Player {
    pub fn human(color: Color) -> Self {
        Self {
            color,
            human: true,
            active: true,
        }
    }

    pub fn computer(color: Color) -> Self {
        Self {
            color,
            human: false,
            active: true,
        }
    }
}

/// Observer of board changes (renderers, loggers, network relays)
pub trait BoardListener {
    /// A game was started or restored; pieces follow via `place_piece`
    fn new_game(&mut self, players: &[Player]);

    fn place_piece(&mut self, pos: Position, color: Color);

    fn move_piece(&mut self, from: Position, to: Position);

    /// `rank` starts at 1 for the first player to finish
    fn player_finished(&mut self, _player: &Player, _rank: usize) {}
}

/// Settings for a new game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// 2, 3, 4 or 6
    pub num_players: usize,
    /// 1..=MAX_DIFFICULTY, doubles as the search depth
    pub difficulty: u8,
    /// Leading seats controlled by people
    pub human_seats: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 2,
            difficulty: DEFAULT_DIFFICULTY,
            human_seats: 1,
        }
    }
}

impl GameConfig {
    pub fn new(num_players: usize) -> Self {
        Self {
            num_players,
            ..Default::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_human_seats(mut self, human_seats: usize) -> Self {
        self.human_seats = human_seats;
        self
    }

    /// Every seat played by the engine
    pub fn all_computer(self) -> Self {
        self.with_human_seats(0)
    }
}

fn validate_difficulty(difficulty: u8) -> Result<()> {
    if (1..=MAX_DIFFICULTY).contains(&difficulty) {
        Ok(())
    } else {
        Err(Error::InvalidDifficulty(difficulty))
    }
}

/// On-disk form of a game; the layout is rebuilt from `num_players`
#[derive(Serialize, Deserialize)]
struct SavedGame {
    board: Board,
    num_players: usize,
    num_pieces: usize,
    difficulty: u8,
    players: Vec<Player>,
    rotation: Vec<Color>,
    turn: usize,
    ranking: Vec<Color>,
}

// ============================================================================
// GAME
// ============================================================================

/// The authoritative game: owns the live board
pub struct Game {
    board: Board,
    layout: Layout,
    /// Seat order, finished players included
    players: Vec<Player>,
    /// Colors still playing, in seat order
    rotation: Vec<Color>,
    /// Index into `rotation` of the player to move
    turn: usize,
    /// Finished colors, first finisher first
    ranking: Vec<Color>,
    difficulty: u8,
    heuristics: Heuristics,
    listeners: Vec<Box<dyn BoardListener>>,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Set up a fresh game with every piece on its home cluster
    pub fn new(config: GameConfig) -> Result<Self> {
        validate_difficulty(config.difficulty)?;
        let layout = Layout::new(config.num_players)?;

        let players: Vec<Player> = layout
            .seats()
            .iter()
            .enumerate()
            .map(|(seat, &color)| {
                if seat < config.human_seats {
                    Player::human(color)
                } else {
                    Player::computer(color)
                }
            })
            .collect();

        let mut board = Board::new();
        for &color in layout.seats() {
            for &pos in layout.home(color) {
                board.place(pos, color)?;
            }
        }

        tracing::info!(
            "New game: {} players, {} pieces each, difficulty {}",
            config.num_players,
            layout.num_pieces(),
            config.difficulty
        );

        Ok(Self {
            board,
            rotation: layout.seats().to_vec(),
            layout,
            players,
            turn: 0,
            ranking: Vec::new(),
            difficulty: config.difficulty,
            heuristics: Heuristics::default(),
            listeners: Vec::new(),
        })
    }

    /// Restart with a new configuration, keeping listeners
    pub fn start(&mut self, config: GameConfig) -> Result<()> {
        let fresh = Game::new(config)?;
        self.replace_with(fresh);
        Ok(())
    }

    pub fn add_listener(&mut self, listener: Box<dyn BoardListener>) {
        self.listeners.push(listener);
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for puzzles and tests; no rules are enforced
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, color: Color) -> Option<&Player> {
        self.players.iter().find(|p| p.color == color)
    }

    pub fn rotation(&self) -> &[Color] {
        &self.rotation
    }

    pub fn ranking(&self) -> &[Color] {
        &self.ranking
    }

    /// Finishers in order followed by whoever is still playing
    pub fn standings(&self) -> Vec<Color> {
        self.ranking.iter().chain(&self.rotation).copied().collect()
    }

    pub fn num_players(&self) -> usize {
        self.layout.num_players()
    }

    pub fn num_pieces(&self) -> usize {
        self.layout.num_pieces()
    }

    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: u8) -> Result<()> {
        validate_difficulty(difficulty)?;
        self.difficulty = difficulty;
        Ok(())
    }

    pub fn set_heuristics(&mut self, heuristics: Heuristics) {
        self.heuristics = heuristics;
    }

    /// Color to move, `None` once nobody is left
    pub fn current_player(&self) -> Option<Color> {
        self.rotation.get(self.turn).copied()
    }

    /// The game ends when at most one player is still playing
    pub fn is_over(&self) -> bool {
        self.rotation.len() <= 1
    }

    /// Snapshot for search
    pub fn snapshot(&self) -> GameState {
        GameState::from_board(&self.board)
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// Cells the piece at `from` may move to this turn
    pub fn legal_destinations(&self, from: Position) -> Vec<Position> {
        legal_destinations(&self.board, from)
    }

    /// Every move available to `color`
    pub fn legal_moves_for(&self, color: Color) -> Vec<Move> {
        self.board
            .pieces(color)
            .flat_map(|from| legal_moves(&self.board, from))
            .collect()
    }

    /// Move one of the current player's pieces
    ///
    /// Returns `false` without touching the board or notifying anyone when
    /// the move is not allowed.
    pub fn move_piece(&mut self, from: Position, to: Position) -> bool {
        let Some(mover) = self.current_player().filter(|_| !self.is_over()) else {
            tracing::debug!("Move {} -> {} rejected: game is over", from, to);
            return false;
        };

        if self.board.classify(from) != Cell::Occupied(mover) {
            tracing::debug!("Move {} -> {} rejected: not a {} piece", from, to, mover);
            return false;
        }

        let Some(mv) = legal_moves(&self.board, from).into_iter().find(|m| m.to == to) else {
            tracing::debug!("Move not allowed. from: {}, to: {}", from, to);
            return false;
        };

        self.apply(&mv)
    }

    /// Play a move previously produced by [`Game::legal_moves_for`]
    pub fn play_move(&mut self, mv: &Move) -> bool {
        self.move_piece(mv.from, mv.to)
    }

    /// Let the engine pick and play a move for the current player
    ///
    /// Returns the move played, or `None` if the player had to pass or the
    /// game is over.
    pub fn make_move(&mut self) -> Option<Move> {
        if self.is_over() {
            return None;
        }
        let mover = self.current_player()?;

        let chosen = {
            let ai = MinimaxAI::for_difficulty(self.difficulty, &self.layout)
                .with_heuristics(self.heuristics.clone());
            ai.best_move(&self.snapshot(), mover, &self.rotation)
                .and_then(|selection| selection.mv)
        };

        if let Some(mv) = chosen {
            if self.apply(&mv) {
                return Some(mv);
            }
        }

        tracing::debug!("{} passes", mover);
        self.finish_turn(mover);
        None
    }

    /// Skip the current player's turn
    pub fn pass(&mut self) {
        if let Some(mover) = self.current_player() {
            self.finish_turn(mover);
        }
    }

    /// Remove `color` from play if all its pieces are home
    ///
    /// Returns true only when this call finished the player.
    pub fn check_for_winner(&mut self, color: Color) -> bool {
        if !has_finished(&self.board, color, &self.layout) {
            return false;
        }
        let Some(index) = self.rotation.iter().position(|&c| c == color) else {
            return false;
        };

        self.rotation.remove(index);
        if index < self.turn {
            self.turn -= 1;
        }
        if self.rotation.is_empty() {
            self.turn = 0;
        } else {
            self.turn %= self.rotation.len();
        }

        self.ranking.push(color);
        let rank = self.ranking.len();

        let mut finished = None;
        if let Some(player) = self.players.iter_mut().find(|p| p.color == color) {
            player.active = false;
            finished = Some(*player);
        }

        tracing::info!("{} finished in place {}", color, rank);
        if let Some(player) = finished {
            for listener in &mut self.listeners {
                listener.player_finished(&player, rank);
            }
        }

        true
    }

    fn apply(&mut self, mv: &Move) -> bool {
        let color = match self.board.relocate(mv.from, mv.to) {
            Ok(color) => color,
            Err(e) => {
                tracing::warn!("Could not apply {} -> {}: {}", mv.from, mv.to, e);
                return false;
            }
        };

        for listener in &mut self.listeners {
            listener.move_piece(mv.from, mv.to);
        }

        self.finish_turn(color);
        true
    }

    fn finish_turn(&mut self, mover: Color) {
        let finished = self.check_for_winner(mover);
        if !finished && !self.rotation.is_empty() {
            self.turn = (self.turn + 1) % self.rotation.len();
        }
    }

    fn notify_new_game(&mut self) {
        for listener in &mut self.listeners {
            listener.new_game(&self.players);
            for (pos, color) in self.board.occupied() {
                listener.place_piece(pos, color);
            }
        }
    }

    fn replace_with(&mut self, mut other: Game) {
        other.listeners = std::mem::take(&mut self.listeners);
        *self = other;
        self.notify_new_game();
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Write the full game to `writer` as JSON
    pub fn save_to<W: Write>(&self, writer: W) -> Result<()> {
        let saved = SavedGame {
            board: self.board.clone(),
            num_players: self.num_players(),
            num_pieces: self.num_pieces(),
            difficulty: self.difficulty,
            players: self.players.clone(),
            rotation: self.rotation.clone(),
            turn: self.turn,
            ranking: self.ranking.clone(),
        };
        serde_json::to_writer(writer, &saved)?;
        Ok(())
    }

    /// Read a game written by [`Game::save_to`]
    pub fn restore<R: Read>(reader: R) -> Result<Game> {
        let saved: SavedGame = serde_json::from_reader(reader)?;
        Game::from_saved(saved)
    }

    /// Replace this game with a saved one, keeping listeners
    pub fn load_from<R: Read>(&mut self, reader: R) -> Result<()> {
        let restored = Game::restore(reader)?;
        self.replace_with(restored);
        Ok(())
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Game> {
        Game::restore(BufReader::new(File::open(path)?))
    }

    fn from_saved(saved: SavedGame) -> Result<Game> {
        validate_difficulty(saved.difficulty)?;
        let layout = Layout::new(saved.num_players)?;

        if saved.num_pieces != layout.num_pieces() {
            return Err(Error::CorruptSave(format!(
                "{} players use {} pieces, save says {}",
                saved.num_players,
                layout.num_pieces(),
                saved.num_pieces
            )));
        }

        let seat_colors: Vec<Color> = saved.players.iter().map(|p| p.color).collect();
        if seat_colors != layout.seats() {
            return Err(Error::CorruptSave(format!(
                "seats {:?} do not match a {}-player game",
                seat_colors, saved.num_players
            )));
        }

        // Rotation and ranking partition the seats
        let mut listed: Vec<Color> = Vec::with_capacity(layout.seats().len());
        for &color in saved.rotation.iter().chain(&saved.ranking) {
            if !layout.seats().contains(&color) || listed.contains(&color) {
                return Err(Error::CorruptSave(format!(
                    "{} is unseated or listed twice in rotation/ranking",
                    color
                )));
            }
            listed.push(color);
        }
        if listed.len() != layout.seats().len() {
            return Err(Error::CorruptSave(
                "rotation and ranking do not cover every seat".to_string(),
            ));
        }

        if let Some(player) = saved
            .players
            .iter()
            .find(|p| p.active != saved.rotation.contains(&p.color))
        {
            return Err(Error::CorruptSave(format!(
                "{} active flag disagrees with the rotation",
                player.color
            )));
        }

        if saved.turn >= saved.rotation.len().max(1) {
            return Err(Error::CorruptSave(format!("turn index {} out of range", saved.turn)));
        }

        for color in Color::ALL {
            let expected = if layout.seats().contains(&color) {
                layout.num_pieces()
            } else {
                0
            };
            let found = saved.board.count(color);
            if found != expected {
                return Err(Error::CorruptSave(format!(
                    "{} has {} pieces, expected {}",
                    color, found, expected
                )));
            }
        }

        tracing::info!(
            "Restored game: {} players, {} still playing",
            saved.num_players,
            saved.rotation.len()
        );

        Ok(Game {
            board: saved.board,
            layout,
            players: saved.players,
            rotation: saved.rotation,
            turn: saved.turn,
            ranking: saved.ranking,
            difficulty: saved.difficulty,
            heuristics: Heuristics::default(),
            listeners: Vec::new(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        NewGame(usize),
        Place(Position, Color),
        Move(Position, Position),
        Finished(Color, usize),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.0.borrow().clone()
        }

        fn clear(&self) {
            self.0.borrow_mut().clear();
        }
    }

    impl BoardListener for Recorder {
        fn new_game(&mut self, players: &[Player]) {
            self.0.borrow_mut().push(Event::NewGame(players.len()));
        }

        fn place_piece(&mut self, pos: Position, color: Color) {
            self.0.borrow_mut().push(Event::Place(pos, color));
        }

        fn move_piece(&mut self, from: Position, to: Position) {
            self.0.borrow_mut().push(Event::Move(from, to));
        }

        fn player_finished(&mut self, player: &Player, rank: usize) {
            self.0.borrow_mut().push(Event::Finished(player.color, rank));
        }
    }

    fn game(num_players: usize) -> Game {
        Game::new(GameConfig::new(num_players).all_computer()).unwrap()
    }

    /// Move every Red piece onto Red's goal except one, which waits next to
    /// the last free goal cell (1, -5)
    fn red_one_step_from_finishing(game: &mut Game) {
        let home: Vec<Position> = game.layout().home(Color::Red).to_vec();
        let goal: Vec<Position> = game.layout().goal(Color::Red).to_vec();
        let board = game.board_mut();
        for pos in home {
            board.clear(pos).unwrap();
        }
        for &pos in goal.iter().filter(|&&p| p != Position::new(1, -5)) {
            board.place(pos, Color::Red).unwrap();
        }
        board.place(Position::new(1, -4), Color::Red).unwrap();
    }

    #[test]
    fn test_new_game_setup() {
        let g = game(3);
        assert_eq!(g.rotation(), &[Color::Red, Color::Green, Color::Blue]);
        assert_eq!(g.current_player(), Some(Color::Red));
        for &color in g.rotation() {
            assert_eq!(g.board().count(color), 10);
        }
        assert_eq!(g.board().count(Color::Cyan), 0);
        assert!(!g.is_over());
    }

    #[test]
    fn test_human_seats() {
        let g = Game::new(GameConfig::new(4).with_human_seats(1)).unwrap();
        assert!(g.players()[0].human);
        assert!(g.players()[1..].iter().all(|p| !p.human));
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(
            Game::new(GameConfig::new(5)),
            Err(Error::UnsupportedPlayerCount(5))
        ));
        assert!(matches!(
            Game::new(GameConfig::new(2).with_difficulty(0)),
            Err(Error::InvalidDifficulty(0))
        ));

        let mut g = game(2);
        assert!(g.set_difficulty(MAX_DIFFICULTY + 1).is_err());
        assert_eq!(g.difficulty(), DEFAULT_DIFFICULTY);
        g.set_difficulty(3).unwrap();
        assert_eq!(g.difficulty(), 3);
    }

    #[test]
    fn test_start_notifies_listeners() {
        let recorder = Recorder::default();
        let mut g = game(2);
        g.add_listener(Box::new(recorder.clone()));
        g.start(GameConfig::new(6).all_computer()).unwrap();

        let events = recorder.events();
        assert_eq!(events[0], Event::NewGame(6));
        let placements = events.iter().filter(|e| matches!(e, Event::Place(..))).count();
        assert_eq!(placements, 60);
        assert_eq!(g.num_players(), 6);
    }

    #[test]
    fn test_legal_move_is_applied() {
        let recorder = Recorder::default();
        let mut g = game(2);
        g.add_listener(Box::new(recorder.clone()));

        let from = Position::new(0, 4);
        let to = Position::new(0, 3);
        assert!(g.legal_destinations(from).contains(&to));
        assert!(g.move_piece(from, to));

        assert!(g.board().is_empty(from));
        assert_eq!(g.board().classify(to), Cell::Occupied(Color::Red));
        assert_eq!(g.current_player(), Some(Color::Cyan));
        assert_eq!(recorder.events(), vec![Event::Move(from, to)]);
    }

    #[test]
    fn test_illegal_moves_are_rejected() {
        let recorder = Recorder::default();
        let mut g = game(2);
        g.add_listener(Box::new(recorder.clone()));
        let before = g.board().clone();

        // Not a reachable cell
        assert!(!g.move_piece(Position::new(0, 4), Position::new(0, 0)));
        // Not Red's piece
        assert!(!g.move_piece(Position::new(0, -4), Position::new(0, -3)));
        // Empty source
        assert!(!g.move_piece(Position::new(0, 0), Position::new(0, 1)));
        // Off the board
        assert!(!g.move_piece(Position::new(9, 9), Position::new(0, 1)));

        assert_eq!(g.board(), &before);
        assert_eq!(g.current_player(), Some(Color::Red));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_jump_chain_move() {
        let mut g = game(2);
        let board = g.board_mut();
        // Red piece directly behind a Cyan blocker
        board.place(Position::new(0, 2), Color::Cyan).unwrap();
        board.place(Position::new(0, 3), Color::Red).unwrap();

        assert!(g.legal_destinations(Position::new(0, 3)).contains(&Position::new(0, 1)));
        assert!(g.move_piece(Position::new(0, 3), Position::new(0, 1)));
        assert_eq!(g.board().classify(Position::new(0, 1)), Cell::Occupied(Color::Red));
        assert_eq!(g.board().classify(Position::new(0, 2)), Cell::Occupied(Color::Cyan));
    }

    #[test]
    fn test_finishing_eliminates_only_that_player() {
        let recorder = Recorder::default();
        let mut g = game(3);
        g.add_listener(Box::new(recorder.clone()));
        red_one_step_from_finishing(&mut g);

        assert!(g.move_piece(Position::new(1, -4), Position::new(1, -5)));

        assert_eq!(g.rotation(), &[Color::Green, Color::Blue]);
        assert_eq!(g.ranking(), &[Color::Red]);
        assert_eq!(g.current_player(), Some(Color::Green));
        assert!(!g.player(Color::Red).unwrap().active);
        assert!(g.player(Color::Green).unwrap().active);
        assert!(g.player(Color::Blue).unwrap().active);
        assert!(recorder.events().contains(&Event::Finished(Color::Red, 1)));
        assert!(!g.is_over());
    }

    #[test]
    fn test_check_for_winner_after_placement() {
        let mut g = game(3);
        let home: Vec<Position> = g.layout().home(Color::Red).to_vec();
        let goal: Vec<Position> = g.layout().goal(Color::Red).to_vec();
        for pos in home {
            g.board_mut().clear(pos).unwrap();
        }
        for pos in goal {
            g.board_mut().place(pos, Color::Red).unwrap();
        }

        assert!(!g.check_for_winner(Color::Green));
        assert!(g.check_for_winner(Color::Red));
        assert!(!g.check_for_winner(Color::Red));
        assert_eq!(g.rotation(), &[Color::Green, Color::Blue]);
        // Red was to move; the turn passes to the next seat
        assert_eq!(g.current_player(), Some(Color::Green));
    }

    #[test]
    fn test_last_player_standing_ends_game() {
        let mut g = game(2);
        let home: Vec<Position> = g.layout().home(Color::Red).to_vec();
        let goal: Vec<Position> = g.layout().goal(Color::Red).to_vec();
        {
            let board = g.board_mut();
            for pos in home {
                board.clear(pos).unwrap();
            }
            // Cyan's home is Red's goal; Red pieces replace Cyan's
            for pos in goal {
                board.place(pos, Color::Red).unwrap();
            }
        }
        assert!(g.check_for_winner(Color::Red));
        assert!(g.is_over());
        assert_eq!(g.standings(), vec![Color::Red, Color::Cyan]);
        assert!(g.make_move().is_none());
        assert!(!g.move_piece(Position::new(0, -4), Position::new(0, -3)));
    }

    #[test]
    fn test_make_move_plays_one_move() {
        let recorder = Recorder::default();
        let mut g = game(2);
        g.add_listener(Box::new(recorder.clone()));
        let before = g.snapshot();

        let mv = g.make_move().expect("opening position has moves");
        assert_eq!(before.classify(mv.from), Cell::Occupied(Color::Red));
        assert!(g.board().is_empty(mv.from));
        assert_eq!(g.board().classify(mv.to), Cell::Occupied(Color::Red));
        assert_eq!(g.current_player(), Some(Color::Cyan));
        assert_eq!(recorder.events(), vec![Event::Move(mv.from, mv.to)]);

        let changed = Board::positions()
            .filter(|&p| before.classify(p) != g.board().classify(p))
            .count();
        assert_eq!(changed, 2);
    }

    #[test]
    fn test_make_move_passes_without_pieces() {
        let mut g = game(2);
        let red: Vec<Position> = g.board().pieces(Color::Red).collect();
        for pos in red {
            g.board_mut().clear(pos).unwrap();
        }
        assert!(g.make_move().is_none());
        assert_eq!(g.current_player(), Some(Color::Cyan));
    }

    #[test]
    fn test_save_restore_round_trip() {
        let mut g = Game::new(GameConfig::new(4).with_difficulty(2)).unwrap();
        assert!(g.move_piece(Position::new(-1, 5), Position::new(0, 4)));

        let mut buffer = Vec::new();
        g.save_to(&mut buffer).unwrap();
        let restored = Game::restore(buffer.as_slice()).unwrap();

        for pos in Board::positions() {
            assert_eq!(restored.board().classify(pos), g.board().classify(pos));
        }
        assert_eq!(restored.num_players(), 4);
        assert_eq!(restored.num_pieces(), 10);
        assert_eq!(restored.difficulty(), 2);
        assert_eq!(restored.players(), g.players());
        assert_eq!(restored.current_player(), Some(Color::Yellow));
        assert_eq!(restored.layout().goal(Color::Red), g.layout().goal(Color::Red));
    }

    #[test]
    fn test_load_from_notifies_listeners() {
        let source = game(3);
        let mut buffer = Vec::new();
        source.save_to(&mut buffer).unwrap();

        let recorder = Recorder::default();
        let mut g = game(2);
        g.add_listener(Box::new(recorder.clone()));
        recorder.clear();

        g.load_from(buffer.as_slice()).unwrap();
        let events = recorder.events();
        assert_eq!(events[0], Event::NewGame(3));
        assert_eq!(events.len(), 1 + 30);
        assert_eq!(g.rotation(), source.rotation());
    }

    #[test]
    fn test_corrupt_saves_are_reported() {
        assert!(matches!(
            Game::restore(&b"not json"[..]),
            Err(Error::Serialization(_))
        ));

        let mut g = game(2);
        g.board_mut().clear(Position::new(0, 4)).unwrap();
        let mut buffer = Vec::new();
        g.save_to(&mut buffer).unwrap();
        assert!(matches!(
            Game::restore(buffer.as_slice()),
            Err(Error::CorruptSave(_))
        ));
    }

    fn restore_with(game: &Game, edit: impl FnOnce(&mut serde_json::Value)) -> Result<Game> {
        let mut buffer = Vec::new();
        game.save_to(&mut buffer).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        edit(&mut value);
        Game::restore(serde_json::to_vec(&value).unwrap().as_slice())
    }

    #[test]
    fn test_inconsistent_rotation_is_rejected() {
        let g = game(3);

        // Duplicate seat, Blue missing
        let duplicate = restore_with(&g, |v| {
            v["rotation"] = serde_json::json!(["Red", "Red", "Green"]);
        });
        assert!(matches!(duplicate, Err(Error::CorruptSave(_))));

        // Blue missing from both lists
        let missing = restore_with(&g, |v| {
            v["rotation"] = serde_json::json!(["Red", "Green"]);
        });
        assert!(matches!(missing, Err(Error::CorruptSave(_))));

        // Unseated color
        let unseated = restore_with(&g, |v| {
            v["rotation"] = serde_json::json!(["Red", "Green", "Cyan"]);
        });
        assert!(matches!(unseated, Err(Error::CorruptSave(_))));

        // Red both finished and still playing
        let overlap = restore_with(&g, |v| {
            v["ranking"] = serde_json::json!(["Red"]);
        });
        assert!(matches!(overlap, Err(Error::CorruptSave(_))));

        // Ranked but still flagged active
        let flagged = restore_with(&g, |v| {
            v["rotation"] = serde_json::json!(["Green", "Blue"]);
            v["ranking"] = serde_json::json!(["Red"]);
        });
        assert!(matches!(flagged, Err(Error::CorruptSave(_))));

        assert!(restore_with(&g, |_| {}).is_ok());
    }

    #[test]
    fn test_restore_after_elimination() {
        let mut g = game(3);
        red_one_step_from_finishing(&mut g);
        assert!(g.move_piece(Position::new(1, -4), Position::new(1, -5)));

        let restored = restore_with(&g, |_| {}).unwrap();
        assert_eq!(restored.rotation(), &[Color::Green, Color::Blue]);
        assert_eq!(restored.ranking(), &[Color::Red]);
        assert_eq!(restored.current_player(), Some(Color::Green));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("starhalma-test-{}.json", std::process::id()));
        let g = game(6);
        g.save(&path).unwrap();
        let loaded = Game::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.board(), g.board());
        assert_eq!(loaded.rotation(), g.rotation());
    }
}
