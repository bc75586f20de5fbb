//! Static evaluation of a position.
//!
//! Cheap terms only: material, a territory estimate from the same flood-fill
//! the scorer uses, liberties of every group, prisoners, and where the stones
//! sit (toward the centre, on the corners). Finished games are scored exactly
//! instead.

use crate::board::{Board, Color, Point};
use crate::constants::{
    WEIGHT_ATARI, WEIGHT_CAPTURE, WEIGHT_CENTER, WEIGHT_CORNER, WEIGHT_FINAL, WEIGHT_LIBERTY,
    WEIGHT_STONE, WEIGHT_TERRITORY,
};
use crate::game::GameState;
use crate::scoring::{area_count, territory};

/// Integer weights for each evaluation term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalWeights {
    pub stone: i32,
    pub territory: i32,
    pub liberty: i32,
    pub atari: i32,
    pub capture: i32,
    /// Per step of [`centrality`] for every stone.
    pub center: i32,
    /// Per stone on a corner point.
    pub corner: i32,
    pub final_score: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            stone: WEIGHT_STONE,
            territory: WEIGHT_TERRITORY,
            liberty: WEIGHT_LIBERTY,
            atari: WEIGHT_ATARI,
            capture: WEIGHT_CAPTURE,
            center: WEIGHT_CENTER,
            corner: WEIGHT_CORNER,
            final_score: WEIGHT_FINAL,
        }
    }
}

/// Score `state` from the point of view of `perspective`. Positive is good.
pub fn evaluate(state: &GameState, perspective: Color, weights: &EvalWeights) -> i32 {
    if state.is_terminal() {
        return final_value(state, perspective, weights);
    }

    let board = state.board();
    let sign = |c: Color| if c == perspective { 1 } else { -1 };

    let stones = board.stone_count(perspective) as i32
        - board.stone_count(perspective.opposite()) as i32;

    let terr = territory(board);
    let territory = terr.get(perspective) as i32 - terr.get(perspective.opposite()) as i32;

    let mut liberties = 0;
    let mut ataris = 0;
    for group in board.groups() {
        liberties += sign(group.color) * group.liberty_count() as i32;
        if group.in_atari() {
            ataris += sign(group.color);
        }
    }

    let captures = state.captures().get(perspective) as i32
        - state.captures().get(perspective.opposite()) as i32;

    let mut center = 0;
    for p in board.points() {
        if let Some(c) = board.get(p) {
            center += sign(c) * centrality(p, board.size());
        }
    }

    let corners: i32 = corner_points(board)
        .into_iter()
        .filter_map(|p| board.get(p))
        .map(sign)
        .sum();

    weights.stone * stones
        + weights.territory * territory
        + weights.liberty * liberties
        - weights.atari * ataris
        + weights.capture * captures
        + weights.center * center
        + weights.corner * corners
}

/// How far `p` sits toward the centre: `size - 1` at the centre of an odd
/// board, 0 on every corner.
fn centrality(p: Point, size: usize) -> i32 {
    let span = size as i32 - 1;
    let dx = (2 * p.x as i32 - span).abs();
    let dy = (2 * p.y as i32 - span).abs();
    span - (dx + dy) / 2
}

/// The distinct corner points of the board.
fn corner_points(board: &Board) -> Vec<Point> {
    let last = board.size() - 1;
    let mut corners = vec![
        Point::new(0, 0),
        Point::new(last, 0),
        Point::new(0, last),
        Point::new(last, last),
    ];
    corners.sort();
    corners.dedup();
    corners
}

/// Area margin of a finished game, `final_score` per point.
///
/// A resignation counts as losing by the whole board.
fn final_value(state: &GameState, perspective: Color, weights: &EvalWeights) -> i32 {
    if let Some(loser) = state.resigned() {
        let value = weights.final_score * (state.size() * state.size()) as i32;
        return if loser == perspective { -value } else { value };
    }
    let result = area_count(state.board(), state.captures(), state.config().komi);
    let margin = result.get(perspective).total - result.get(perspective.opposite()).total;
    (margin * weights.final_score as f32).round() as i32
}
