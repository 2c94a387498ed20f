//! Command-line interface for tictactoe_relay.

use clap::{Parser, Subcommand};

/// Two-player tic-tac-toe relay server
#[derive(Parser, Debug)]
#[command(name = "tictactoe_relay")]
#[command(about = "Authoritative tic-tac-toe server for two networked players", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// Path to a TOML config file (defaults are used if it does not exist)
        #[arg(short, long, default_value = "tictactoe_relay.toml")]
        config: std::path::PathBuf,

        /// Override the listen address (host:port)
        #[arg(short, long)]
        listen: Option<String>,

        /// Let either player move at any time
        #[arg(long)]
        no_turn_enforcement: bool,

        /// Ignore reset requests
        #[arg(long)]
        no_reset: bool,
    },

    /// Join a running server from the terminal
    Play {
        /// Server address (host:port)
        #[arg(long, default_value = "127.0.0.1:8080")]
        server: String,
    },
}

/// One line typed during `play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayInput {
    /// Claim `(row, col)`.
    Move(i64, i64),
    /// Ask for a new game.
    Reset,
    /// Leave.
    Quit,
}

/// Parses `row col`, `r` or `q`. Anything else is `None`.
pub fn parse_play_input(line: &str) -> Option<PlayInput> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "r" | "reset" => return Some(PlayInput::Reset),
        "q" | "quit" => return Some(PlayInput::Quit),
        _ => {}
    }
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(PlayInput::Move(row, col))
}
