//! tictactoe_relay - server and terminal client entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, PlayInput, parse_play_input};
use std::path::Path;
use tictactoe_relay::{ClientMessage, MoveRequest, RelayClient, RelayConfig, RelayServer, Update};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            listen,
            no_turn_enforcement,
            no_reset,
        } => {
            initialize_tracing("info,tictactoe_relay=debug");
            let config = load_config(&config, listen, no_turn_enforcement, no_reset)?;
            run_server(config).await
        }
        Command::Play { server } => {
            initialize_tracing("warn");
            run_play(server).await
        }
    }
}

fn initialize_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[instrument(skip(config_path))]
fn load_config(
    config_path: &Path,
    listen: Option<String>,
    no_turn_enforcement: bool,
    no_reset: bool,
) -> Result<RelayConfig> {
    let mut config = if config_path.exists() {
        RelayConfig::from_file(config_path)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        RelayConfig::default()
    };

    if let Some(addr) = listen {
        info!(listen_addr = %addr, "Overriding listen address");
        config = config.with_listen_addr(addr);
    }
    if no_turn_enforcement {
        config = config.with_enforce_turns(false);
    }
    if no_reset {
        config = config.with_allow_reset(false);
    }
    Ok(config)
}

/// Run the relay until Ctrl+C.
async fn run_server(config: RelayConfig) -> Result<()> {
    info!("Starting tictactoe relay");

    let server = RelayServer::bind(config).await?;
    info!(addr = %server.local_addr()?, "Server ready, waiting for two players");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Ctrl+C handler failed, shutting down");
            }
        })
        .await;

    info!("Server stopped");
    Ok(())
}

/// Play from the terminal: `row col` to move, `r` to reset, `q` to quit.
async fn run_play(server: String) -> Result<()> {
    let client = RelayClient::connect(server.as_str())
        .await
        .with_context(|| format!("could not join {server}"))?;
    let seat = i64::from(client.player().number());
    println!(
        "Seated as {}. Enter `row col` to move, `r` to reset, `q` to quit.",
        client.player()
    );

    let (mut updates, mut requests) = client.into_split();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            update = updates.next::<Update>() => match update? {
                Some(update) => print_update(&update),
                None => {
                    println!("Server closed the connection");
                    break;
                }
            },
            line = stdin.next_line() => {
                let Some(line) = line? else { break };
                match parse_play_input(&line) {
                    Some(PlayInput::Move(row, col)) => {
                        requests
                            .send(&ClientMessage::Move(MoveRequest::new(seat, row, col)))
                            .await?;
                    }
                    Some(PlayInput::Reset) => requests.send(&ClientMessage::RESET).await?,
                    Some(PlayInput::Quit) => break,
                    None => println!("Expected `row col`, `r` or `q`"),
                }
            }
        }
    }
    Ok(())
}

fn print_update(update: &Update) {
    println!();
    for (r, row) in update.board.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|&v| match v {
                0 => ".".to_string(),
                n => n.to_string(),
            })
            .collect();
        println!(" {}", cells.join(" | "));
        if r < 2 {
            println!("---+---+---");
        }
    }
    if update.is_finished() {
        match update.winner.as_str() {
            "CAT" => println!("Draw! `r` to play again."),
            winner => println!("{winner} wins! `r` to play again."),
        }
    } else {
        let to_move = if update.turn % 2 == 1 { 1 } else { 2 };
        println!("Turn {}: Player {to_move} to move", update.turn);
    }
}
