//! goai: play Go against a small search engine.
//!
//! ## Usage
//!
//! - `goai` or `goai play` - Play in the terminal
//! - `goai gtp` - Start GTP server for GUI integration
//! - `goai selfplay` - Watch the engine play itself

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use goai::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_DEPTH, DEFAULT_KOMI, DEFAULT_ROLLOUTS, DEFAULT_SEED, max_game_len,
};
use goai::gtp::GtpEngine;
use goai::scoring::area_count;
use goai::{
    Budget, Color, GameConfig, GameState, Move, ScoreResult, SearchConfig, SearchReport, Searcher,
    Strategy, score,
};

/// goai: a Go engine with alpha-beta and rollout search
#[derive(Parser)]
#[command(name = "goai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Board size (1 to 25)
    #[arg(long, global = true, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Points given to White
    #[arg(long, global = true, default_value_t = DEFAULT_KOMI, allow_negative_numbers = true)]
    komi: f32,

    /// Search depth in plies; doubles as the difficulty level
    #[arg(long, global = true, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Stop each search after this many nodes
    #[arg(long, global = true)]
    nodes: Option<u64>,

    /// Stop each search after this many milliseconds
    #[arg(long, global = true)]
    time_ms: Option<u64>,

    /// Search strategy: alphabeta or rollout
    #[arg(long, global = true, default_value_t = Strategy::AlphaBeta)]
    strategy: Strategy,

    /// Seed for tie-breaking and playouts
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Playouts per candidate move (rollout strategy)
    #[arg(long, global = true, default_value_t = DEFAULT_ROLLOUTS)]
    rollouts: usize,

    /// Log search details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Play a game in the terminal
    Play {
        #[arg(long, value_enum, default_value = "human-black")]
        mode: Mode,
    },
    /// Let the engine play both sides
    Selfplay,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Two humans at one keyboard
    HumanVsHuman,
    /// Human plays Black against the engine
    HumanBlack,
    /// Engine plays Black against a human
    AiBlack,
}

impl Mode {
    fn ai_color(self) -> Option<Color> {
        match self {
            Mode::HumanVsHuman => None,
            Mode::HumanBlack => Some(Color::White),
            Mode::AiBlack => Some(Color::Black),
        }
    }
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        Ok(GameConfig::new(self.size, self.komi)?)
    }

    fn searcher(&self) -> Searcher {
        Searcher::new(SearchConfig {
            strategy: self.strategy,
            seed: self.seed,
            rollouts: self.rollouts,
            ..SearchConfig::default()
        })
    }

    fn budget(&self) -> Budget {
        let mut budget = Budget::depth(self.depth);
        if let Some(nodes) = self.nodes {
            budget = budget.with_nodes(nodes);
        }
        if let Some(ms) = self.time_ms {
            budget = budget.with_time(Duration::from_millis(ms));
        }
        budget
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let state = GameState::new(cli.game_config()?)?;
    let searcher = cli.searcher();
    let budget = cli.budget();

    match cli.command {
        Some(Commands::Gtp) => GtpEngine::new(state, searcher, budget).run(),
        Some(Commands::Selfplay) => run_selfplay(state, &searcher, budget),
        Some(Commands::Play { mode }) => run_play(state, &searcher, budget, mode),
        None => run_play(state, &searcher, budget, Mode::HumanBlack),
    }
}

fn log_report(state: &GameState, report: &SearchReport) {
    info!(
        best = %report.best.to_vertex(state.size()),
        score = report.score,
        depth = report.depth_reached,
        aborted = report.aborted,
        "evaluated {} nodes in {:.2}s",
        report.nodes,
        report.elapsed.as_secs_f64()
    );
}

fn print_score(result: &ScoreResult) {
    for color in [Color::Black, Color::White] {
        let side = result.get(color);
        println!(
            "{color}: {} stones + {} territory + {} captures = {}",
            side.stones, side.territory, side.captures, side.total
        );
    }
    if result.komi != 0.0 {
        println!("(White's total includes komi {})", result.komi);
    }
    println!("Result: {result}");
}

fn run_selfplay(mut state: GameState, searcher: &Searcher, budget: Budget) -> Result<()> {
    let limit = max_game_len(state.size());
    while !state.is_terminal() && state.history().len() < limit {
        let color = state.to_move();
        let report = searcher.search(&state, budget);
        log_report(&state, &report);
        state.play(report.best)?;
        println!(
            "{:>3}. {color} {}",
            state.history().len(),
            report.best.to_vertex(state.size())
        );
    }

    println!("{state}");
    if state.is_terminal() {
        print_score(&score(&state)?);
    } else {
        println!("Stopped after {limit} moves.");
        print_score(&area_count(state.board(), state.captures(), state.config().komi));
    }
    Ok(())
}

fn run_play(mut state: GameState, searcher: &Searcher, budget: Budget, mode: Mode) -> Result<()> {
    let ai = mode.ai_color();
    let size = state.size();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Commands: <vertex> (e.g. D4), pass, resign, undo, hint, score, quit");

    while !state.is_terminal() {
        println!("\n{state}");

        if ai == Some(state.to_move()) {
            let report = searcher.search(&state, budget);
            log_report(&state, &report);
            state.play(report.best)?;
            println!("Engine plays {}", report.best.to_vertex(size));
            continue;
        }

        print!("{}> ", state.to_move());
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let input = line.trim();

        match input.to_lowercase().as_str() {
            "" => {}
            "quit" | "exit" => return Ok(()),
            "undo" => {
                // Against the engine, take back its reply as well.
                let steps = if ai.is_some() { 2 } else { 1 };
                if state.history().len() < steps {
                    println!("Nothing to undo.");
                    continue;
                }
                for _ in 0..steps {
                    state.undo()?;
                }
            }
            "hint" => {
                let report = searcher.search(&state, budget);
                log_report(&state, &report);
                println!("Hint: {}", report.best.to_vertex(size));
            }
            "score" => {
                print_score(&area_count(state.board(), state.captures(), state.config().komi));
            }
            other => match Move::parse(other, size) {
                Ok(mv) => {
                    if let Err(e) = state.play(mv) {
                        println!("Illegal move: {e}");
                    }
                }
                Err(e) => println!("{e}"),
            },
        }
    }

    println!("\n{state}");
    print_score(&score(&state)?);
    Ok(())
}
