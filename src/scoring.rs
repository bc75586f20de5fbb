//! Area scoring.
//!
//! Each color's total is stones on the board, plus empty regions bordered
//! only by that color, plus prisoners taken. Komi goes to White. Regions
//! touching both colors, or no stones at all, belong to nobody.

use std::fmt;

use tracing::info;

use crate::board::{Board, Color, Point};
use crate::error::GoError;
use crate::game::{Captures, GameState};

/// Territory counts per color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Territory {
    pub black: usize,
    pub white: usize,
    /// Empty points owned by neither color.
    pub neutral: usize,
}

impl Territory {
    pub fn get(&self, color: Color) -> usize {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}

/// Flood-fill every maximal empty region and credit single-color borders.
pub fn territory(board: &Board) -> Territory {
    let size = board.size();
    let mut visited = vec![false; size * size];
    let mut result = Territory::default();

    for start in board.points() {
        if board.get(start).is_some() || visited[start.y * size + start.x] {
            continue;
        }

        let mut region = 0;
        let mut touches_black = false;
        let mut touches_white = false;
        let mut stack: Vec<Point> = vec![start];
        visited[start.y * size + start.x] = true;

        while let Some(p) = stack.pop() {
            region += 1;
            for n in board.neighbors(p) {
                match board.get(n) {
                    Some(Color::Black) => touches_black = true,
                    Some(Color::White) => touches_white = true,
                    None => {
                        let i = n.y * size + n.x;
                        if !visited[i] {
                            visited[i] = true;
                            stack.push(n);
                        }
                    }
                }
            }
        }

        match (touches_black, touches_white) {
            (true, false) => result.black += region,
            (false, true) => result.white += region,
            _ => result.neutral += region,
        }
    }

    result
}

/// One color's share of the final count.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorScore {
    pub stones: usize,
    pub territory: usize,
    pub captures: u32,
    /// Stones + territory + captures (+ komi for White).
    pub total: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreResult {
    pub black: ColorScore,
    pub white: ColorScore,
    pub komi: f32,
    /// `None` when the totals are equal and nobody resigned.
    pub winner: Option<Color>,
    pub resigned: Option<Color>,
}

impl ScoreResult {
    pub fn get(&self, color: Color) -> &ColorScore {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    /// Black's total minus White's total.
    pub fn margin(&self) -> f32 {
        self.black.total - self.white.total
    }
}

impl fmt::Display for ScoreResult {
    /// GTP result notation: `B+3.5`, `W+R`, or `0` for no result.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.winner, self.resigned) {
            (Some(w), Some(_)) => write!(f, "{}+R", w.letter()),
            (Some(w), None) => write!(f, "{}+{}", w.letter(), self.margin().abs()),
            (None, _) => write!(f, "0"),
        }
    }
}

/// Count the board as if the game ended now.
pub fn area_count(board: &Board, captures: &Captures, komi: f32) -> ScoreResult {
    let terr = territory(board);
    let side = |color: Color| {
        let stones = board.stone_count(color);
        let territory = terr.get(color);
        let captures = captures.get(color);
        let bonus = if color == Color::White { komi } else { 0.0 };
        ColorScore {
            stones,
            territory,
            captures,
            total: (stones + territory) as f32 + captures as f32 + bonus,
        }
    };
    let black = side(Color::Black);
    let white = side(Color::White);

    let winner = if black.total > white.total {
        Some(Color::Black)
    } else if white.total > black.total {
        Some(Color::White)
    } else {
        None
    };

    ScoreResult {
        black,
        white,
        komi,
        winner,
        resigned: None,
    }
}

/// Final score of a finished game.
///
/// A resignation decides the winner regardless of the count.
pub fn score(state: &GameState) -> Result<ScoreResult, GoError> {
    if !state.is_terminal() {
        return Err(GoError::GameNotOver);
    }
    let mut result = area_count(state.board(), state.captures(), state.config().komi);
    if let Some(loser) = state.resigned() {
        result.resigned = Some(loser);
        result.winner = Some(loser.opposite());
    }
    info!(result = %result, black = result.black.total, white = result.white.total, "game scored");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board_from_layout;
    use crate::game::{GameConfig, Move};

    #[test]
    fn empty_board_is_neutral() {
        let board = Board::new(5).unwrap();
        let t = territory(&board);
        assert_eq!(t, Territory { black: 0, white: 0, neutral: 25 });
    }

    #[test]
    fn enclosed_region_scores_to_encloser() {
        let board = board_from_layout(&["..X..", "..X..", "XXX..", ".....", "....."]);
        let t = territory(&board);
        assert_eq!(t.black, 4 + 16);
        assert_eq!(t.white, 0);
    }

    #[test]
    fn shared_region_is_neutral() {
        let board = board_from_layout(&["..X..", "..X..", "XXX..", "....O", "....."]);
        let t = territory(&board);
        assert_eq!(t.black, 4);
        assert_eq!(t.white, 0);
        assert_eq!(t.neutral, 15);
    }

    #[test]
    fn area_count_adds_stones_territory_captures_and_komi() {
        let board = board_from_layout(&[".X.O.", "XX.OO", ".....", ".....", "....."]);
        let captures = Captures { black: 2, white: 1 };
        let result = area_count(&board, &captures, 0.5);
        assert_eq!(result.black.stones, 3);
        assert_eq!(result.black.territory, 1);
        assert_eq!(result.black.total, 6.0);
        assert_eq!(result.white.stones, 3);
        assert_eq!(result.white.territory, 1);
        assert_eq!(result.white.total, 5.5);
        assert_eq!(result.winner, Some(Color::Black));
        assert_eq!(result.to_string(), "B+0.5");
    }

    #[test]
    fn equal_totals_have_no_winner() {
        let board = board_from_layout(&["X...", "....", "....", "...O"]);
        let result = area_count(&board, &Captures::default(), 0.0);
        assert_eq!(result.winner, None);
        assert_eq!(result.to_string(), "0");
    }

    #[test]
    fn score_requires_finished_game() {
        let state = GameState::new(GameConfig::new(5, 0.0).unwrap()).unwrap();
        assert_eq!(score(&state), Err(GoError::GameNotOver));
    }

    #[test]
    fn score_after_two_passes() {
        let mut state = GameState::new(GameConfig::new(5, 0.0).unwrap()).unwrap();
        state.play(Move::Place(Point::new(2, 2))).unwrap();
        state.play(Move::Pass).unwrap();
        state.play(Move::Pass).unwrap();
        let result = score(&state).unwrap();
        assert_eq!(result.black.stones, 1);
        assert_eq!(result.black.territory, 24);
        assert_eq!(result.black.total, 25.0);
        assert_eq!(result.white.total, 0.0);
        assert_eq!(result.winner, Some(Color::Black));
    }

    #[test]
    fn resignation_decides_winner() {
        let mut state = GameState::new(GameConfig::new(5, 0.0).unwrap()).unwrap();
        state.play(Move::Place(Point::new(2, 2))).unwrap();
        state.play(Move::Pass).unwrap();
        state.play(Move::Resign).unwrap();
        let result = score(&state).unwrap();
        assert_eq!(result.winner, Some(Color::White));
        assert_eq!(result.resigned, Some(Color::Black));
        assert_eq!(result.to_string(), "W+R");
    }
}
