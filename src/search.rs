//! Move selection for the computer player.
//!
//! Two strategies share one entry point, [`Searcher::search`]:
//!
//! - [`Strategy::AlphaBeta`] - iterative-deepening negamax with alpha-beta
//!   pruning over cloned [`GameState`]s, leaves scored by [`evaluate`].
//! - [`Strategy::Rollout`] - a fixed number of random playouts per candidate,
//!   candidates evaluated in parallel with rayon, best average margin wins.
//!
//! Both honour a [`Budget`] and an external cancel flag, and both return the
//! best move found so far when stopped early. Ties are broken by a
//! [`fastrand::Rng`] seeded from [`SearchConfig::seed`] on every call.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use fastrand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::board::Point;
use crate::constants::{
    CHECK_PERIOD, DEFAULT_DEPTH, DEFAULT_ROLLOUT_DEPTH, DEFAULT_ROLLOUTS, DEFAULT_SEED, INF,
    ORDER_CAPTURE, ORDER_CAPTURE_PER_STONE, ORDER_ESCAPE_ATARI, ORDER_NEAR, ORDER_SELF_ATARI,
};
use crate::eval::{EvalWeights, evaluate};
use crate::game::{GameState, Move};
use crate::playout::playout;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    AlphaBeta,
    Rollout,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alphabeta" | "alpha-beta" | "minimax" => Ok(Strategy::AlphaBeta),
            "rollout" | "mc" | "montecarlo" => Ok(Strategy::Rollout),
            _ => Err(format!("unknown strategy: {s}")),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::AlphaBeta => write!(f, "alphabeta"),
            Strategy::Rollout => write!(f, "rollout"),
        }
    }
}

/// How much work one call may do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Budget {
    /// Alpha-beta depth in plies. Values below 1 search one ply.
    pub depth: u32,
    /// Cap on visited nodes (alpha-beta) or played plies (rollouts).
    pub max_nodes: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl Budget {
    pub fn depth(depth: u32) -> Self {
        Self {
            depth,
            max_nodes: None,
            time_limit: None,
        }
    }

    pub fn with_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    pub fn with_time(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::depth(DEFAULT_DEPTH)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub seed: u64,
    pub weights: EvalWeights,
    /// Playouts per candidate move (rollout strategy).
    pub rollouts: usize,
    /// Ply limit of each playout (rollout strategy).
    pub rollout_depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            seed: DEFAULT_SEED,
            weights: EvalWeights::default(),
            rollouts: DEFAULT_ROLLOUTS,
            rollout_depth: DEFAULT_ROLLOUT_DEPTH,
        }
    }
}

/// What a search found and what it cost.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchReport {
    pub best: Move,
    /// Value of `best` for the side to move: heuristic units for alpha-beta,
    /// average area margin for rollouts.
    pub score: f64,
    pub nodes: u64,
    /// Deepest completed alpha-beta iteration; 1 for rollouts.
    pub depth_reached: u32,
    pub elapsed: Duration,
    /// Stopped by the time limit, node limit or cancel flag.
    pub aborted: bool,
}

/// Stop conditions shared by every branch of one search.
struct Limits<'a> {
    deadline: Option<Instant>,
    max_nodes: Option<u64>,
    cancel: &'a AtomicBool,
}

impl Limits<'_> {
    fn exhausted(&self, nodes: u64) -> bool {
        if self.max_nodes.is_some_and(|max| nodes >= max) {
            return true;
        }
        if nodes % CHECK_PERIOD != 0 {
            return false;
        }
        self.interrupted()
    }

    fn interrupted(&self) -> bool {
        self.cancel.load(Ordering::Relaxed) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// A candidate move with the state it leads to.
pub struct Candidate {
    pub mv: Move,
    pub next: GameState,
    pub order: i32,
}

/// Legal candidates for the side to move, most promising first, pass last.
///
/// Filling one's own true eye is never proposed. Ordering favours captures,
/// saving groups in atari and moves close to existing stones, and penalises
/// self-atari. Equal keys keep board order, so the result is deterministic.
pub fn ordered_moves(state: &GameState) -> Vec<Candidate> {
    let board = state.board();
    let me = state.to_move();
    let mut out = Vec::new();

    if state.is_terminal() {
        return out;
    }

    for p in board.points() {
        if !board.is_empty_at(p) || board.is_eye(p) == Some(me) {
            continue;
        }
        let Ok(next) = state.after(Move::Place(p)) else {
            continue;
        };
        let order = order_key(state, &next, p);
        out.push(Candidate {
            mv: Move::Place(p),
            next,
            order,
        });
    }
    out.sort_by_key(|c| std::cmp::Reverse(c.order));

    if let Ok(next) = state.after(Move::Pass) {
        out.push(Candidate {
            mv: Move::Pass,
            next,
            order: i32::MIN,
        });
    }
    out
}

fn order_key(state: &GameState, next: &GameState, p: Point) -> i32 {
    let board = state.board();
    let me = state.to_move();
    let mut key = 0;

    let captured = next.captures().get(me) - state.captures().get(me);
    if captured > 0 {
        key += ORDER_CAPTURE + ORDER_CAPTURE_PER_STONE * captured as i32;
    }

    let own = next.board().group_of(p);
    let libs = own.as_ref().map_or(0, |g| g.liberty_count());
    let rescues = board
        .neighbors(p)
        .filter(|&n| board.get(n) == Some(me))
        .filter_map(|n| board.group_of(n))
        .any(|g| g.in_atari());
    if rescues && libs > 1 {
        key += ORDER_ESCAPE_ATARI;
    }
    if libs == 1 && captured == 0 {
        key -= ORDER_SELF_ATARI;
    }

    let dist = board.distance_to_stones(p, ORDER_NEAR.len());
    if let Some(bonus) = ORDER_NEAR.get(dist.wrapping_sub(1)) {
        key += bonus;
    }
    key
}

pub struct Searcher {
    config: SearchConfig,
    cancel: Arc<AtomicBool>,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancel flag with another thread. Setting it makes the running
    /// and every later search return early until it is cleared.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Choose a legal move for the side to move.
    pub fn select_move(&self, state: &GameState, budget: Budget) -> Move {
        self.search(state, budget).best
    }

    pub fn search(&self, state: &GameState, budget: Budget) -> SearchReport {
        let start = Instant::now();
        let limits = Limits {
            deadline: budget.time_limit.map(|t| start + t),
            max_nodes: budget.max_nodes,
            cancel: self.cancel.as_ref(),
        };

        let candidates = ordered_moves(state);
        if candidates.len() <= 1 {
            // Only pass is left (or the game is over and nothing is legal).
            return SearchReport {
                best: Move::Pass,
                score: 0.0,
                nodes: 0,
                depth_reached: 0,
                elapsed: start.elapsed(),
                aborted: false,
            };
        }

        let mut report = match self.config.strategy {
            Strategy::AlphaBeta => self.alpha_beta(state, candidates, budget, &limits),
            Strategy::Rollout => self.rollouts(candidates, &limits),
        };
        report.elapsed = start.elapsed();
        report
    }

    // -- Alpha-beta --

    fn alpha_beta(
        &self,
        state: &GameState,
        mut candidates: Vec<Candidate>,
        budget: Budget,
        limits: &Limits<'_>,
    ) -> SearchReport {
        let mut nodes = 0u64;
        let mut aborted = false;
        let mut depth_reached = 0;
        // Fallback before any iteration completes: the best-ordered candidate.
        let mut best_score = -INF;
        let mut best: Vec<Move> = vec![candidates[0].mv];

        'deepen: for depth in 1..=budget.depth.max(1) {
            let mut iter_score = -INF;
            let mut iter_best: Vec<Move> = Vec::new();

            for cand in &candidates {
                // Searching above `iter_score - 1` keeps every tied value exact.
                let alpha = if iter_best.is_empty() { -INF } else { iter_score - 1 };
                let Some(value) = self.negamax(&cand.next, depth - 1, -INF, -alpha, &mut nodes, limits)
                else {
                    aborted = true;
                    break 'deepen;
                };
                let value = -value;
                if value > iter_score {
                    iter_score = value;
                    iter_best = vec![cand.mv];
                } else if value == iter_score {
                    iter_best.push(cand.mv);
                }
            }

            best_score = iter_score;
            best = iter_best;
            depth_reached = depth;
            debug!(depth, nodes, score = best_score, ties = best.len(), "alpha-beta iteration");

            // Search the current best first next time around.
            candidates.sort_by_key(|c| !best.contains(&c.mv));
        }

        let choice = self.break_tie(&best);
        debug!(
            to_move = %state.to_move(),
            choice = %choice.to_vertex(state.size()),
            depth_reached,
            nodes,
            aborted,
            "alpha-beta done"
        );
        SearchReport {
            best: choice,
            score: best_score as f64,
            nodes,
            depth_reached,
            elapsed: Duration::ZERO,
            aborted,
        }
    }

    /// Negamax value of `state` for its side to move, or `None` when stopped.
    fn negamax(
        &self,
        state: &GameState,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        nodes: &mut u64,
        limits: &Limits<'_>,
    ) -> Option<i32> {
        *nodes += 1;
        if limits.exhausted(*nodes) {
            return None;
        }

        if depth == 0 || state.is_terminal() {
            return Some(evaluate(state, state.to_move(), &self.config.weights));
        }

        let mut best = -INF;
        for cand in ordered_moves(state) {
            let value = -self.negamax(&cand.next, depth - 1, -beta, -alpha, nodes, limits)?;
            best = best.max(value);
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }
        Some(best)
    }

    // -- Rollouts --

    fn rollouts(&self, candidates: Vec<Candidate>, limits: &Limits<'_>) -> SearchReport {
        let per_candidate = limits
            .max_nodes
            .map(|max| (max / candidates.len() as u64).max(1));
        let rollouts = self.config.rollouts.max(1);
        let depth = self.config.rollout_depth;
        let seed = self.config.seed;

        // Each candidate owns its generator, so the outcome does not depend on
        // how rayon schedules the work.
        let results: Vec<(Move, usize, f64, u64)> = candidates
            .par_iter()
            .enumerate()
            .map(|(i, cand)| {
                let mut rng = Rng::with_seed(seed ^ (i as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
                let mut done = 0;
                let mut total = 0.0f64;
                let mut plies = 0u64;
                for _ in 0..rollouts {
                    if limits.interrupted() || per_candidate.is_some_and(|cap| plies >= cap) {
                        break;
                    }
                    let mut sim = cand.next.clone();
                    let result = playout(&mut sim, &mut rng, depth);
                    // The margin is for the opponent, who moves first in `next`.
                    total -= result.margin as f64;
                    plies += result.plies as u64 + 1;
                    done += 1;
                }
                let avg = if done > 0 { total / done as f64 } else { f64::NEG_INFINITY };
                (cand.mv, done, avg, plies)
            })
            .collect();

        let nodes = results.iter().map(|r| r.3).sum();
        let aborted = results.iter().any(|r| r.1 < rollouts);
        let best_avg = results
            .iter()
            .filter(|r| r.1 > 0)
            .map(|r| r.2)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut best: Vec<Move> = results
            .iter()
            .filter(|r| r.1 > 0 && r.2 == best_avg)
            .map(|r| r.0)
            .collect();
        if best.is_empty() {
            best.push(candidates[0].mv);
        }

        let choice = self.break_tie(&best);
        debug!(nodes, score = best_avg, ties = best.len(), aborted, "rollouts done");
        SearchReport {
            best: choice,
            score: best_avg,
            nodes,
            depth_reached: 1,
            elapsed: Duration::ZERO,
            aborted,
        }
    }

    /// Pick among equally valued moves. Placements beat pass on a tie.
    fn break_tie(&self, tied: &[Move]) -> Move {
        let placements: Vec<Move> = tied.iter().copied().filter(|m| !m.is_pass()).collect();
        if placements.is_empty() {
            return tied.first().copied().unwrap_or(Move::Pass);
        }
        let mut rng = Rng::with_seed(self.config.seed);
        placements[rng.usize(..placements.len())]
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
