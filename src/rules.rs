//! Move legality and capture resolution.
//!
//! [`apply_move`] never touches the board it is given: it works on a clone and
//! hands the result back, so search can call it speculatively.

use crate::board::{Board, Color, Point};
use crate::error::GoError;

/// Outcome of a legal stone placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub board: Board,
    /// Opponent stones removed by this move.
    pub captured: Vec<Point>,
    /// Point the opponent may not retake on the next move.
    pub ko: Option<Point>,
}

impl Placement {
    pub fn capture_count(&self) -> u32 {
        self.captured.len() as u32
    }
}

/// Play `color` at `point` on `board` given the current ko point.
///
/// # Errors
/// - `InvalidCoordinate` if the point is off the board
/// - `OccupiedCell` if the point is not empty
/// - `KoViolation` if the point is the forbidden ko recapture
/// - `SuicideMove` if the new group has no liberties and captures nothing
pub fn apply_move(
    board: &Board,
    ko: Option<Point>,
    color: Color,
    point: Point,
) -> Result<Placement, GoError> {
    if !board.contains(point) {
        return Err(GoError::off_board(point, board.size()));
    }
    if board.get(point).is_some() {
        return Err(GoError::OccupiedCell(point));
    }
    if ko == Some(point) {
        return Err(GoError::KoViolation(point));
    }

    let mut next = board.clone();
    next.place_stone(point, color)?;

    let opponent = color.opposite();
    let mut captured = Vec::new();
    for n in board.neighbors(point) {
        if next.get(n) != Some(opponent) {
            continue;
        }
        if let Some(group) = next.group_of(n).filter(|g| g.liberty_count() == 0) {
            next.remove_group(&group);
            captured.extend(group.stones);
        }
    }

    let own = next
        .group_of(point)
        .ok_or_else(|| GoError::off_board(point, board.size()))?;
    if own.liberty_count() == 0 && captured.is_empty() {
        return Err(GoError::SuicideMove(point));
    }

    let ko = if captured.len() == 1 && own.len() == 1 && own.liberty_count() == 1 {
        Some(captured[0])
    } else {
        None
    };

    Ok(Placement {
        board: next,
        captured,
        ko,
    })
}

/// Whether `apply_move` would accept the move, without keeping the result.
pub fn is_legal(board: &Board, ko: Option<Point>, color: Color, point: Point) -> bool {
    apply_move(board, ko, color, point).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board_from_layout;

    #[test]
    fn rejects_occupied_and_off_board() {
        let board = board_from_layout(&["X...", "....", "....", "...."]);
        assert_eq!(
            apply_move(&board, None, Color::White, Point::new(0, 0)),
            Err(GoError::OccupiedCell(Point::new(0, 0)))
        );
        assert!(matches!(
            apply_move(&board, None, Color::White, Point::new(4, 0)),
            Err(GoError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn does_not_mutate_input() {
        let board = board_from_layout(&[".X..", "XO..", ".X..", "...."]);
        let before = board.clone();
        let placement = apply_move(&board, None, Color::Black, Point::new(2, 1)).unwrap();
        assert_eq!(board, before);
        assert_eq!(placement.captured, vec![Point::new(1, 1)]);
        assert_eq!(placement.board.get(Point::new(1, 1)), None);
    }

    #[test]
    fn prevents_suicide() {
        let board = board_from_layout(&[".X..", "X...", "....", "...."]);
        assert_eq!(
            apply_move(&board, None, Color::White, Point::new(0, 0)),
            Err(GoError::SuicideMove(Point::new(0, 0)))
        );
    }

    #[test]
    fn multi_stone_suicide() {
        let board = board_from_layout(&["O.X.", "XXX.", "....", "...."]);
        // White at (1,0) would join (0,0) into a libertyless group.
        assert_eq!(
            apply_move(&board, None, Color::White, Point::new(1, 0)),
            Err(GoError::SuicideMove(Point::new(1, 0)))
        );
    }

    #[test]
    fn capture_beats_suicide() {
        // White fills its last liberty but captures the black corner stone first.
        let board = board_from_layout(&["X.O.", "OO..", "....", "...."]);
        let placement = apply_move(&board, None, Color::White, Point::new(1, 0)).unwrap();
        assert_eq!(placement.captured, vec![Point::new(0, 0)]);
    }

    #[test]
    fn captures_whole_chain() {
        let board = board_from_layout(&[".XX.", "XOOX", "O.OX", "OOX."]);
        let placement = apply_move(&board, None, Color::Black, Point::new(1, 2)).unwrap();
        assert_eq!(placement.capture_count(), 6);
        assert_eq!(placement.board.stone_count(Color::White), 0);
        assert!(placement.ko.is_none());
    }

    #[test]
    fn captures_two_groups_at_once() {
        let board = board_from_layout(&["O.O.", "X.X.", "....", "...."]);
        let board = {
            let mut b = board;
            b.place_stone(Point::new(3, 0), Color::Black).unwrap();
            b
        };
        let placement = apply_move(&board, None, Color::Black, Point::new(1, 0)).unwrap();
        assert_eq!(placement.capture_count(), 2);
        assert!(placement.ko.is_none());
    }

    #[test]
    fn ko_is_recorded_and_enforced() {
        let board = board_from_layout(&[".XO.", "XO.O", ".XO.", "...."]);
        let placement = apply_move(&board, None, Color::Black, Point::new(2, 1)).unwrap();
        assert_eq!(placement.captured, vec![Point::new(1, 1)]);
        assert_eq!(placement.ko, Some(Point::new(1, 1)));

        assert_eq!(
            apply_move(&placement.board, placement.ko, Color::White, Point::new(1, 1)),
            Err(GoError::KoViolation(Point::new(1, 1)))
        );
        assert!(apply_move(&placement.board, None, Color::White, Point::new(1, 1)).is_ok());
    }

    #[test]
    fn single_capture_with_liberties_is_not_ko() {
        let board = board_from_layout(&["XO..", "....", "....", "...."]);
        let placement = apply_move(&board, None, Color::White, Point::new(0, 1)).unwrap();
        assert_eq!(placement.capture_count(), 1);
        assert!(placement.ko.is_none());
    }
}
