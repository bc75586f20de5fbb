//! goai: a Go rule engine and move-search AI.
//!
//! The core keeps a legal board state (liberties, captures, suicide and ko),
//! scores finished games by area, and picks moves for a computer player with
//! alpha-beta search or Monte Carlo rollouts.
//!
//! ## Modules
//!
//! - [`board`] - Board cells, coordinates and group flood-fill
//! - [`rules`] - Move legality, captures and ko
//! - [`game`] - Game record: turn order, history, passes, undo
//! - [`scoring`] - Area scoring and territory flood-fill
//! - [`eval`] - Static position evaluation
//! - [`playout`] - Random game simulation
//! - [`search`] - Alpha-beta and rollout move selection
//! - [`gtp`] - Go Text Protocol front end
//! - [`constants`] - Defaults for every tunable parameter
//!
//! ## Example
//!
//! ```
//! use goai::{Budget, Move, new_game, play, select_move};
//!
//! let state = new_game(9).unwrap();
//! assert_eq!(state.config().komi, 2.5);
//! let state = play(&state, Move::parse("E5", 9).unwrap()).unwrap();
//!
//! let reply = select_move(&state, Budget::depth(1));
//! assert!(goai::legal_moves(&state).any(|m| m == reply));
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod eval;
pub mod game;
pub mod gtp;
pub mod playout;
pub mod rules;
pub mod scoring;
pub mod search;

pub use board::{Board, Color, Group, Point};
pub use error::GoError;
pub use game::{Captures, GameConfig, GameState, Move, Turn};
pub use scoring::{ScoreResult, score};
pub use search::{Budget, SearchConfig, SearchReport, Searcher, Strategy};

/// Start a game on an empty `board_size` x `board_size` board with default komi.
pub fn new_game(board_size: usize) -> Result<GameState, GoError> {
    GameState::new(GameConfig {
        board_size,
        ..GameConfig::default()
    })
}

/// Every legal move for the side to move, pass included.
pub fn legal_moves(state: &GameState) -> impl Iterator<Item = Move> + '_ {
    state.legal_moves()
}

/// The state after `mv`; `state` itself is left alone.
pub fn play(state: &GameState, mv: Move) -> Result<GameState, GoError> {
    state.after(mv)
}

pub fn is_terminal(state: &GameState) -> bool {
    state.is_terminal()
}

/// Pick a move with the default search configuration.
pub fn select_move(state: &GameState, budget: Budget) -> Move {
    Searcher::default().select_move(state, budget)
}
