//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays random legal moves that do not fill the mover's own true
//! eyes until both sides pass or the ply limit is hit, then counts the board.
//! Randomness comes from a caller-owned [`fastrand::Rng`], so a playout is
//! reproducible from its seed.

use fastrand::Rng;

use crate::board::Point;
use crate::game::{GameState, Move};
use crate::scoring::area_count;

/// Result of a single playout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayoutResult {
    /// Area margin from the point of view of the side to move at the start.
    pub margin: f32,
    /// Moves played, passes included.
    pub plies: u32,
}

/// Play `state` out randomly for at most `max_plies` moves.
pub fn playout(state: &mut GameState, rng: &mut Rng, max_plies: u32) -> PlayoutResult {
    let me = state.to_move();
    let mut plies = 0;

    while !state.is_terminal() && plies < max_plies {
        let mv = choose_random_move(state, rng).map_or(Move::Pass, Move::Place);
        // Candidates are validated against a clone, so this cannot fail.
        if state.play(mv).is_err() {
            break;
        }
        plies += 1;
    }

    let result = area_count(state.board(), state.captures(), state.config().komi);
    PlayoutResult {
        margin: result.get(me).total - result.get(me.opposite()).total,
        plies,
    }
}

/// Choose a random legal move that is not one of the mover's true eyes.
///
/// Scans from a random starting point and tries candidates in random order
/// until one is legal.
fn choose_random_move(state: &GameState, rng: &mut Rng) -> Option<Point> {
    let board = state.board();
    let me = state.to_move();
    let points: Vec<Point> = board.points().collect();
    let start = rng.usize(..points.len());

    let mut candidates: Vec<Point> = points[start..]
        .iter()
        .chain(&points[..start])
        .copied()
        .filter(|&p| board.is_empty_at(p) && board.is_eye(p) != Some(me))
        .collect();

    let n = candidates.len();
    for i in 0..n {
        let j = i + rng.usize(..n - i);
        candidates.swap(i, j);
        if state.is_legal(candidates[i]) {
            return Some(candidates[i]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::constants::max_game_len;
    use crate::game::GameConfig;

    fn game(size: usize) -> GameState {
        GameState::new(GameConfig::new(size, 0.0).unwrap()).unwrap()
    }

    #[test]
    fn playout_terminates() {
        let mut state = game(5);
        let mut rng = Rng::with_seed(7);
        let result = playout(&mut state, &mut rng, max_game_len(5) as u32);
        assert!(result.plies > 0);
        assert!(state.is_terminal() || result.plies == max_game_len(5) as u32);
    }

    #[test]
    fn playout_is_reproducible() {
        let mut a = game(5);
        let mut b = game(5);
        let ra = playout(&mut a, &mut Rng::with_seed(42), 200);
        let rb = playout(&mut b, &mut Rng::with_seed(42), 200);
        assert_eq!(ra, rb);
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn playout_respects_ply_limit() {
        let mut state = game(9);
        let result = playout(&mut state, &mut Rng::with_seed(3), 5);
        assert_eq!(result.plies, 5);
        assert_eq!(state.history().len(), 5);
    }

    #[test]
    fn never_fills_own_eye() {
        let mut state = game(3);
        // Black owns the corner eye at A3.
        for v in ["B3", "pass", "A2", "pass", "B2", "pass"] {
            state.play(Move::parse(v, 3).unwrap()).unwrap();
        }
        let mut rng = Rng::with_seed(1);
        for _ in 0..20 {
            if let Some(p) = choose_random_move(&state, &mut rng) {
                assert_ne!(p, Point::new(0, 0));
            }
        }
        assert_eq!(state.to_move(), Color::Black);
    }
}
