//! Game record: the authoritative board, whose turn it is, and how we got here.
//!
//! A [`GameState`] is a plain value. Drivers own one and thread it through
//! every call; search clones it freely.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::board::{Board, Color, Point};
use crate::constants::{DEFAULT_BOARD_SIZE, DEFAULT_KOMI, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::GoError;
use crate::rules::{apply_move, is_legal};

/// Board size and scoring convention, fixed for the life of a game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub board_size: usize,
    /// Points added to White's total at scoring time.
    pub komi: f32,
}

impl GameConfig {
    pub fn new(board_size: usize, komi: f32) -> Result<Self, GoError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&board_size) {
            return Err(GoError::InvalidBoardSize(board_size));
        }
        if !komi.is_finite() {
            return Err(GoError::InvalidKomi(komi.to_string()));
        }
        Ok(Self { board_size, komi })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            komi: DEFAULT_KOMI,
        }
    }
}

/// An action submitted for the color to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Place(Point),
    Pass,
    Resign,
}

impl Move {
    pub fn is_pass(self) -> bool {
        self == Move::Pass
    }

    /// Parse a GTP vertex, `pass` or `resign`.
    pub fn parse(s: &str, size: usize) -> Result<Move, GoError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pass") {
            Ok(Move::Pass)
        } else if s.eq_ignore_ascii_case("resign") {
            Ok(Move::Resign)
        } else {
            Point::from_vertex(s, size).map(Move::Place)
        }
    }

    pub fn to_vertex(self, size: usize) -> String {
        match self {
            Move::Place(p) => p.to_vertex(size),
            Move::Pass => "pass".into(),
            Move::Resign => "resign".into(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place(p) => write!(f, "{p}"),
            Move::Pass => write!(f, "pass"),
            Move::Resign => write!(f, "resign"),
        }
    }
}

/// A recorded move and the color that made it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Turn {
    pub color: Color,
    pub mv: Move,
}

/// Prisoners taken, indexed by the capturing color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn add(&mut self, color: Color, count: u32) {
        match color {
            Color::Black => self.black += count,
            Color::White => self.white += count,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    to_move: Color,
    history: Vec<Turn>,
    captures: Captures,
    ko: Option<Point>,
    passes: u8,
    resigned: Option<Color>,
}

impl GameState {
    /// Start a game on an empty board with Black to move.
    pub fn new(config: GameConfig) -> Result<Self, GoError> {
        let config = GameConfig::new(config.board_size, config.komi)?;
        Ok(Self {
            board: Board::new(config.board_size)?,
            config,
            to_move: Color::Black,
            history: Vec::new(),
            captures: Captures::default(),
            ko: None,
            passes: 0,
            resigned: None,
        })
    }

    /// Replay `turns` from an empty board, each for the color it names.
    pub fn with_moves(config: GameConfig, turns: &[Turn]) -> Result<Self, GoError> {
        let mut state = Self::new(config)?;
        for turn in turns {
            state.to_move = turn.color;
            state.play(turn.mv)?;
        }
        Ok(state)
    }

    // -- Accessors --

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn ko(&self) -> Option<Point> {
        self.ko
    }

    pub fn consecutive_passes(&self) -> u8 {
        self.passes
    }

    pub fn resigned(&self) -> Option<Color> {
        self.resigned
    }

    /// Two consecutive passes or a resignation.
    pub fn is_terminal(&self) -> bool {
        self.passes >= 2 || self.resigned.is_some()
    }

    // -- Move generation --

    /// Whether the color to move may play `point`.
    pub fn is_legal(&self, point: Point) -> bool {
        !self.is_terminal() && is_legal(&self.board, self.ko, self.to_move, point)
    }

    /// Every legal placement for the color to move, then pass.
    ///
    /// Lazy and recomputed on each call; empty once the game is over.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        let open = !self.is_terminal();
        self.board
            .points()
            .filter(move |&p| open && self.is_legal(p))
            .map(Move::Place)
            .chain(open.then_some(Move::Pass))
    }

    // -- Game actions --

    /// Apply a move for the color to move.
    ///
    /// On error the state is left exactly as it was.
    pub fn play(&mut self, mv: Move) -> Result<(), GoError> {
        if self.is_terminal() {
            return Err(GoError::GameAlreadyOver);
        }
        let color = self.to_move;

        match mv {
            Move::Place(point) => {
                let placement = apply_move(&self.board, self.ko, color, point).inspect_err(|e| {
                    trace!(%color, %point, error = %e, "rejected move");
                })?;
                self.captures.add(color, placement.capture_count());
                self.board = placement.board;
                self.ko = placement.ko;
                self.passes = 0;
            }
            Move::Pass => {
                self.ko = None;
                self.passes += 1;
            }
            Move::Resign => {
                self.resigned = Some(color);
            }
        }

        self.history.push(Turn { color, mv });
        self.to_move = color.opposite();
        Ok(())
    }

    /// Functional form of [`play`](Self::play): returns the successor state.
    pub fn after(&self, mv: Move) -> Result<GameState, GoError> {
        let mut next = self.clone();
        next.play(mv)?;
        Ok(next)
    }

    /// Take back the last move by replaying the history without it.
    ///
    /// Returns the removed turn, or `None` at the start of the game.
    pub fn undo(&mut self) -> Result<Option<Turn>, GoError> {
        let Some((last, rest)) = self.history.split_last() else {
            return Ok(None);
        };
        let last = *last;
        *self = Self::with_moves(self.config, rest)?;
        Ok(Some(last))
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        write!(
            f,
            "Move {}: {} to play, captures B {} W {}",
            self.history.len() + 1,
            self.to_move,
            self.captures.black,
            self.captures.white
        )
    }
}

impl FromStr for GameConfig {
    type Err = GoError;

    /// Parse `"<size>"` or `"<size>:<komi>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (size, komi) = s.split_once(':').unwrap_or((s, ""));
        let size = size
            .trim()
            .parse()
            .map_err(|_| GoError::InvalidConfig(format!("board size {size:?}")))?;
        let komi = if komi.trim().is_empty() {
            DEFAULT_KOMI
        } else {
            komi.trim()
                .parse()
                .map_err(|_| GoError::InvalidKomi(komi.trim().to_string()))?
        };
        GameConfig::new(size, komi)
    }
}
