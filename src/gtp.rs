//! Go Text Protocol (GTP) implementation.
//!
//! GTP is a text-based protocol for communicating with Go-playing programs.
//! This module implements the GTP version 2 subset needed to drive the engine
//! from graphical Go interfaces like Sabaki or GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Start over on a new board (1 to 25)
//! - `clear_board` - Start over on the current board size
//! - `komi <value>` - Change komi, keeping the position
//! - `play <color> <vertex>` - Play a move
//! - `genmove <color>` - Search, play and print a move
//! - `undo` - Take back the last move
//! - `final_score` - Area count of the current position
//! - `showboard` - Print the board
//!
//! ## Example
//!
//! ```no_run
//! use goai::gtp::GtpEngine;
//! use goai::{Budget, GameConfig, GameState, Searcher};
//!
//! let state = GameState::new(GameConfig::default()).unwrap();
//! let mut engine = GtpEngine::new(state, Searcher::default(), Budget::default());
//! engine.run().unwrap();
//! ```

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::{debug, info};

use crate::board::Color;
use crate::error::GoError;
use crate::game::{GameConfig, GameState, Move};
use crate::scoring::{area_count, score};
use crate::search::{Budget, Searcher};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    /// Current game
    state: GameState,
    searcher: Searcher,
    /// Budget for every `genmove`
    budget: Budget,
}

impl GtpEngine {
    pub fn new(state: GameState, searcher: Searcher, budget: Budget) -> Self {
        Self {
            state,
            searcher,
            budget,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run the GTP command loop on stdin and stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "goai".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                let komi = self.state.config().komi;
                match GameConfig::new(size, komi).and_then(GameState::new) {
                    Ok(state) => {
                        self.state = state;
                        (true, String::new())
                    }
                    Err(_) => (false, "unacceptable size".to_string()),
                }
            }

            "clear_board" => match GameState::new(*self.state.config()) {
                Ok(state) => {
                    self.state = state;
                    (true, String::new())
                }
                Err(e) => (false, e.to_string()),
            },

            "komi" => {
                let Some(Ok(komi)) = args.first().map(|a| a.parse::<f32>()) else {
                    return (false, "invalid komi".to_string());
                };
                let replayed = GameConfig::new(self.state.size(), komi)
                    .and_then(|config| GameState::with_moves(config, self.state.history()));
                match replayed {
                    Ok(state) => {
                        self.state = state;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "play" => {
                let [color, vertex, ..] = args else {
                    return (false, "missing arguments".to_string());
                };
                let color = match color.parse::<Color>() {
                    Ok(c) => c,
                    Err(e) => return (false, e.to_string()),
                };
                let mv = match Move::parse(vertex, self.state.size()) {
                    Ok(mv) => mv,
                    Err(e) => return (false, e.to_string()),
                };
                let mut next = self.state.clone();
                let played = Self::hand_turn_to(&mut next, color).and_then(|()| next.play(mv));
                match played {
                    Ok(()) => {
                        self.state = next;
                        (true, String::new())
                    }
                    Err(e) => (false, format!("illegal move: {e}")),
                }
            }

            "genmove" => {
                let color = match args.first().map(|a| a.parse::<Color>()) {
                    Some(Ok(c)) => c,
                    Some(Err(e)) => return (false, e.to_string()),
                    None => return (false, "missing argument".to_string()),
                };
                if self.state.is_terminal() {
                    return (true, "pass".to_string());
                }
                let mut next = self.state.clone();
                if let Err(e) = Self::hand_turn_to(&mut next, color) {
                    return (false, e.to_string());
                }

                let report = self.searcher.search(&next, self.budget);
                info!(
                    nodes = report.nodes,
                    depth = report.depth_reached,
                    secs = report.elapsed.as_secs_f64(),
                    "evaluated {} nodes in {:.2}s",
                    report.nodes,
                    report.elapsed.as_secs_f64()
                );

                match next.play(report.best) {
                    Ok(()) => {
                        self.state = next;
                        (true, report.best.to_vertex(self.state.size()))
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "undo" => match self.state.undo() {
                Ok(Some(turn)) => {
                    debug!(color = %turn.color, mv = %turn.mv, "undone");
                    (true, String::new())
                }
                Ok(None) => (false, "cannot undo".to_string()),
                Err(e) => (false, e.to_string()),
            },

            "final_score" => {
                let result = if self.state.is_terminal() {
                    score(&self.state)
                } else {
                    Ok(area_count(
                        self.state.board(),
                        self.state.captures(),
                        self.state.config().komi,
                    ))
                };
                match result {
                    Ok(result) => (true, result.to_string()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.state)),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Make `color` the side to move, passing for the other side if needed.
    ///
    /// Refuses when that pass would end the game.
    fn hand_turn_to(state: &mut GameState, color: Color) -> Result<(), GoError> {
        if state.to_move() == color {
            return Ok(());
        }
        if state.consecutive_passes() > 0 {
            return Err(GoError::InvalidColor(format!(
                "{color} is not to move"
            )));
        }
        state.play(Move::Pass)
    }
}
