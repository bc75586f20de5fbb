//! Default game and engine parameters.
//!
//! Every value here is only a default: board size and komi travel in
//! [`GameConfig`](crate::game::GameConfig), search knobs in
//! [`SearchConfig`](crate::search::SearchConfig) and
//! [`EvalWeights`](crate::eval::EvalWeights).

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Smallest accepted board size.
pub const MIN_BOARD_SIZE: usize = 1;

/// Largest accepted board size. GTP column letters run out at 25 (A-Z without I).
pub const MAX_BOARD_SIZE: usize = 25;

/// Column letters used for vertices, skipping 'I'.
pub const COLUMN_LETTERS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Points added to White's total. The half point rules out drawn games.
pub const DEFAULT_KOMI: f32 = 2.5;

/// Maximum game length in moves for self-play and rollouts (3 times board area).
pub fn max_game_len(size: usize) -> usize {
    size * size * 3
}

// =============================================================================
// Search Parameters
// =============================================================================

/// Default alpha-beta depth in plies.
pub const DEFAULT_DEPTH: u32 = 2;

/// Default number of playouts per candidate for the rollout strategy.
pub const DEFAULT_ROLLOUTS: usize = 32;

/// Default seed for tie-breaking and rollouts.
pub const DEFAULT_SEED: u64 = 1;

/// Plies a rollout may run when the budget gives no depth.
pub const DEFAULT_ROLLOUT_DEPTH: u32 = 64;

/// Nodes between deadline and cancel-flag checks.
pub const CHECK_PERIOD: u64 = 256;

/// Score bound larger than any evaluation.
pub const INF: i32 = 1_000_000;

// =============================================================================
// Move Ordering
// =============================================================================

/// Base bonus for a move that captures at least one stone.
pub const ORDER_CAPTURE: i32 = 1_000;

/// Additional bonus per captured stone.
pub const ORDER_CAPTURE_PER_STONE: i32 = 100;

/// Bonus for a move that gives an own group in atari more liberties.
pub const ORDER_ESCAPE_ATARI: i32 = 400;

/// Bonus by Chebyshev distance to the nearest stone (1, 2).
pub const ORDER_NEAR: [i32; 2] = [60, 30];

/// Penalty for playing into self-atari.
pub const ORDER_SELF_ATARI: i32 = 300;

// =============================================================================
// Evaluation Weights
// =============================================================================

/// Weight of each stone on the board.
pub const WEIGHT_STONE: i32 = 10;

/// Weight of each point of estimated territory.
pub const WEIGHT_TERRITORY: i32 = 8;

/// Weight of each liberty of a group.
pub const WEIGHT_LIBERTY: i32 = 2;

/// Penalty for each group left in atari.
pub const WEIGHT_ATARI: i32 = 6;

/// Weight of each captured prisoner.
pub const WEIGHT_CAPTURE: i32 = 15;

/// Weight of each step a stone sits toward the centre.
pub const WEIGHT_CENTER: i32 = 1;

/// Weight of each stone on a corner point.
pub const WEIGHT_CORNER: i32 = 5;

/// Scale applied to the final area score of a finished game.
pub const WEIGHT_FINAL: i32 = 100;
