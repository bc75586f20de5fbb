//! Integration tests for goai
//!
//! Positions are built from move sequences through the public API, the same
//! way a driver would play them.

use goai::constants::max_game_len;
use goai::{
    Budget, Color, GameConfig, GameState, GoError, Move, Point, SearchConfig, Searcher, Strategy,
    is_terminal, legal_moves, new_game, play, score, select_move,
};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Parse a GTP vertex on a board of the given size.
fn mv(vertex: &str, size: usize) -> Move {
    Move::parse(vertex, size).unwrap()
}

/// Play a sequence of moves from an empty board, alternating Black and White.
/// "pass" can be used to pass.
fn setup_position(size: usize, moves: &[&str]) -> GameState {
    moves.iter().fold(new_game(size).unwrap(), |state, v| {
        play(&state, mv(v, size)).unwrap()
    })
}

fn at(state: &GameState, vertex: &str) -> Option<Color> {
    let p = Point::from_vertex(vertex, state.size()).unwrap();
    state.board().get(p)
}

// =============================================================================
// Game creation
// =============================================================================

#[test]
fn new_game_starts_empty_with_black() {
    let state = new_game(9).unwrap();
    assert!(state.board().is_clear());
    assert_eq!(state.to_move(), Color::Black);
    assert_eq!(state.captures().black, 0);
    assert_eq!(state.captures().white, 0);
    assert_eq!(state.ko(), None);
    assert!(!is_terminal(&state));
}

#[test]
fn new_game_rejects_bad_sizes() {
    assert_eq!(new_game(0).unwrap_err(), GoError::InvalidBoardSize(0));
    assert_eq!(new_game(26).unwrap_err(), GoError::InvalidBoardSize(26));
    assert!(new_game(1).is_ok());
    assert!(new_game(25).is_ok());
}

#[test]
fn empty_board_legal_moves() {
    let state = new_game(5).unwrap();
    let moves: Vec<Move> = legal_moves(&state).collect();
    assert_eq!(moves.len(), 25 + 1);
    assert_eq!(moves.last(), Some(&Move::Pass));
}

#[test]
fn play_does_not_modify_input_state() {
    let state = new_game(5).unwrap();
    let next = play(&state, mv("C3", 5)).unwrap();
    assert!(state.board().is_clear());
    assert_eq!(state.to_move(), Color::Black);
    assert_eq!(at(&next, "C3"), Some(Color::Black));
    assert_eq!(next.to_move(), Color::White);
}

// =============================================================================
// Captures
// =============================================================================

#[test]
fn centre_stone_captured_on_five_by_five() {
    let state = setup_position(5, &["C3", "C2", "A1", "B3", "E1", "D3", "E5"]);
    assert_eq!(at(&state, "C3"), Some(Color::Black));
    assert_eq!(state.captures().white, 0);

    let state = play(&state, mv("C4", 5)).unwrap();
    assert_eq!(at(&state, "C3"), None);
    assert_eq!(state.captures().white, 1);
    assert_eq!(state.captures().black, 0);
}

#[test]
fn capture_restores_neighbour_liberties() {
    let state = setup_position(5, &["C3", "C2", "A1", "B3", "E1", "D3", "E5", "C4"]);
    let c3 = Point::from_vertex("C3", 5).unwrap();
    for vertex in ["C2", "B3", "D3", "C4"] {
        let group = state
            .board()
            .group_of(Point::from_vertex(vertex, 5).unwrap())
            .unwrap();
        assert!(group.liberties.contains(&c3), "{vertex} should gain C3");
    }
}

#[test]
fn capture_removes_whole_group() {
    let state = setup_position(5, &["A1", "A2", "B1", "B2", "E5"]);
    let state = play(&state, mv("C1", 5)).unwrap();
    assert_eq!(at(&state, "A1"), None);
    assert_eq!(at(&state, "B1"), None);
    assert_eq!(state.captures().white, 2);
}

#[test]
fn suicide_is_rejected_and_board_unchanged() {
    let state = setup_position(5, &["E5", "A2", "E4", "B1"]);
    let before = state.board().clone();
    let err = play(&state, mv("A1", 5)).unwrap_err();
    assert_eq!(err, GoError::SuicideMove(Point::from_vertex("A1", 5).unwrap()));
    assert_eq!(state.board(), &before);
    assert_eq!(state.to_move(), Color::Black);
}

#[test]
fn occupied_point_is_rejected() {
    let state = setup_position(5, &["C3"]);
    let err = play(&state, mv("C3", 5)).unwrap_err();
    assert!(matches!(err, GoError::OccupiedCell(_)));
}

// =============================================================================
// Ko
// =============================================================================

/// Black takes the ko at B3 by playing C3.
fn ko_position() -> GameState {
    setup_position(5, &["B4", "C4", "A3", "B3", "B2", "D3", "E5", "C2", "C3"])
}

#[test]
fn ko_recapture_is_rejected_immediately() {
    let state = ko_position();
    let b3 = Point::from_vertex("B3", 5).unwrap();
    assert_eq!(state.captures().black, 1);
    assert_eq!(state.ko(), Some(b3));

    assert_eq!(play(&state, Move::Place(b3)).unwrap_err(), GoError::KoViolation(b3));
    assert!(!legal_moves(&state).any(|m| m == Move::Place(b3)));
}

#[test]
fn ko_recapture_is_legal_after_intervening_moves() {
    let state = ko_position();
    let state = play(&state, mv("E1", 5)).unwrap();
    let state = play(&state, mv("A5", 5)).unwrap();
    let state = play(&state, mv("B3", 5)).unwrap();
    assert_eq!(at(&state, "C3"), None);
    assert_eq!(state.captures().white, 1);
}

// =============================================================================
// Termination and scoring
// =============================================================================

#[test]
fn two_passes_end_the_game() {
    let state = setup_position(5, &["C3", "pass"]);
    assert!(!is_terminal(&state));
    assert_eq!(score(&state).unwrap_err(), GoError::GameNotOver);

    let state = play(&state, Move::Pass).unwrap();
    assert!(is_terminal(&state));
    assert_eq!(legal_moves(&state).count(), 0);
    assert_eq!(play(&state, mv("A1", 5)).unwrap_err(), GoError::GameAlreadyOver);
}

#[test]
fn default_komi_gives_white_the_empty_board() {
    let state = setup_position(9, &["pass", "pass"]);
    let result = score(&state).unwrap();
    assert_eq!(result.komi, 2.5);
    assert_eq!(result.white.total, 2.5);
    assert_eq!(result.winner, Some(Color::White));
    assert_eq!(result.to_string(), "W+2.5");
}

#[test]
fn non_finite_komi_is_rejected() {
    assert!(matches!(GameConfig::new(9, f32::NAN), Err(GoError::InvalidKomi(_))));
    assert!(matches!("9:inf".parse::<GameConfig>(), Err(GoError::InvalidKomi(_))));
}

#[test]
fn score_on_empty_board_is_not_over() {
    let state = new_game(9).unwrap();
    assert_eq!(score(&state).unwrap_err(), GoError::GameNotOver);
}

#[test]
fn enclosed_region_scores_to_encloser() {
    let state = setup_position(
        5,
        &["C1", "E5", "C2", "pass", "C3", "pass", "C4", "pass", "C5", "pass", "pass"],
    );
    assert!(is_terminal(&state));
    let result = score(&state).unwrap();
    assert_eq!(result.black.stones, 5);
    assert_eq!(result.black.territory, 10);
    assert_eq!(result.black.total, 15.0);
    assert_eq!(result.white.stones, 1);
    assert_eq!(result.white.territory, 0);
    assert_eq!(result.winner, Some(Color::Black));
}

#[test]
fn komi_decides_close_games() {
    let config = GameConfig::new(3, 9.5).unwrap();
    let state = GameState::new(config).unwrap();
    let state = play(&state, Move::Place(Point::new(1, 1))).unwrap();
    let state = play(&state, Move::Pass).unwrap();
    let state = play(&state, Move::Pass).unwrap();
    let result = score(&state).unwrap();
    assert_eq!(result.black.total, 9.0);
    assert_eq!(result.white.total, 9.5);
    assert_eq!(result.winner, Some(Color::White));
    assert_eq!(result.to_string(), "W+0.5");
}

#[test]
fn resignation_ends_the_game() {
    let state = setup_position(5, &["C3", "resign"]);
    assert!(is_terminal(&state));
    let result = score(&state).unwrap();
    assert_eq!(result.winner, Some(Color::Black));
    assert_eq!(result.resigned, Some(Color::White));
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn select_move_is_deterministic() {
    let state = setup_position(7, &["D4", "C3", "E5"]);
    let budget = Budget::depth(2);
    let first = select_move(&state, budget);
    for _ in 0..3 {
        assert_eq!(select_move(&state, budget), first);
    }
}

#[test]
fn rollout_search_is_deterministic() {
    let searcher = Searcher::new(SearchConfig {
        strategy: Strategy::Rollout,
        seed: 11,
        rollouts: 4,
        ..SearchConfig::default()
    });
    let state = setup_position(5, &["C3", "B2"]);
    let first = searcher.select_move(&state, Budget::default());
    assert_eq!(searcher.select_move(&state, Budget::default()), first);
    assert!(legal_moves(&state).any(|m| m == first));
}

#[test]
fn search_captures_the_centre_stone() {
    let state = setup_position(5, &["C3", "C2", "A1", "B3", "E1", "D3", "E5"]);
    assert_eq!(select_move(&state, Budget::depth(1)), mv("C4", 5));
}

#[test]
fn self_play_terminates_with_legal_moves() {
    let searcher = Searcher::default();
    let mut state = new_game(5).unwrap();
    while !is_terminal(&state) && state.history().len() < max_game_len(5) {
        let choice = searcher.select_move(&state, Budget::depth(1));
        assert!(legal_moves(&state).any(|m| m == choice), "{choice} is not legal");
        state = play(&state, choice).unwrap();
    }
    assert!(state.history().len() <= max_game_len(5));
}
