use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::info;
use tokio::sync::mpsc;

use tafl_client::{
    decode, decode_lenient, init_logging, parse_command, render, viking_name, ClientNode,
    NodeExit, SessionContext, Stub, TcpTransport,
};

/// Terminal client for 11×11 tafl games played against a remote engine.
#[derive(Parser)]
#[command(name = "tafl-client")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join a game hosted by an engine server.
    ///
    /// The server must speak this crate's own protocol, not HTTP: bincode
    /// `Message` frames behind a 4-byte big-endian length prefix over TCP,
    /// opened with a version handshake. A `GameApi` served by `Skeleton` on a
    /// `TcpTransport` is such a server.
    Play {
        #[arg(long, env = "TAFL_SERVER", default_value = "127.0.0.1:8080")]
        server: String,
        /// Session identifier of the game to join.
        #[arg(long, env = "TAFL_GAME")]
        game: String,
        /// Display name; a random viking name if omitted.
        #[arg(long, env = "TAFL_PLAYER")]
        name: Option<String>,
    },
    /// Decode a CHFEN string and print the board.
    Decode {
        notation: String,
        /// Skip malformed tokens instead of rejecting the string.
        #[arg(long)]
        lenient: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { notation, lenient } => {
            if lenient {
                println!("{}", decode_lenient(&notation));
            } else {
                let position = decode(&notation)?;
                println!("{}", position.grid);
                println!("{} to move", position.turn());
            }
        }
        Commands::Play { server, game, name } => {
            let name = name.unwrap_or_else(|| viking_name(&mut rand::rng()).to_string());
            let session = SessionContext::new(name, game)?;
            println!("Connecting to {} as {}...", server, session.player_name());
            let transport = TcpTransport::connect(&server).await?;
            let api = Arc::new(Stub::new(transport));

            let game_id = session.game_id().to_string();
            let host = Box::new(move || info!("session {} cleared", game_id));
            let (mut node, mut snapshots) = ClientNode::new(api, session, host);

            let (tx, rx) = mpsc::channel(16);
            std::thread::spawn(move || {
                println!("Enter a tile (e.g. F6 or \"5 5\"), r to refresh, q to abort.");
                for line in std::io::stdin().lines() {
                    let Ok(line) = line else { break };
                    match parse_command(&line) {
                        Some(event) => {
                            if tx.blocking_send(event).is_err() {
                                break;
                            }
                        }
                        None => eprintln!("Unrecognised input: {}", line.trim()),
                    }
                }
            });

            let display = tokio::spawn(async move {
                while snapshots.changed().await.is_ok() {
                    let snapshot = snapshots.borrow_and_update().clone();
                    println!("\n{}", render(&snapshot));
                }
            });

            match node.run(rx).await {
                NodeExit::Aborted => println!("Game aborted."),
                NodeExit::SessionInvalid => println!("The server does not know this game."),
                NodeExit::Closed => {}
            }
            drop(node);
            let _ = display.await;
        }
    }
    Ok(())
}
