//! In-memory realtime chat broker.
//!
//! Accepts WebSocket connections, pushes the full chat history on connect,
//! fans the updated history out to every connection after each accepted
//! message, and broadcasts the live user count on connect/disconnect.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! cargo run --bin server -- --history-limit 1000 --send-queue-capacity 32
//! ```

use std::sync::Arc;

use chat_broker_rs::{
    common::{logger::setup_logger, time::SystemClock},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryBrokerRepository,
    },
    ui::Server,
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetRoomStateUseCase, SendMessageUseCase,
        Sequencer,
    },
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "In-memory realtime chat broker with full-history fan-out", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Keep only the most recent N messages (default: unbounded history)
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    history_limit: Option<usize>,

    /// Capacity of each connection's outbound send queue; a client whose
    /// queue overflows is force-disconnected instead of stalling broadcasts
    #[arg(long, default_value = "64")]
    send_queue_capacity: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository (Connection Registry + Message Store)
    // 2. MessagePusher
    // 3. Clock / Sequencer
    // 4. UseCases
    // 5. Server

    let repository = Arc::new(match args.history_limit {
        Some(limit) => InMemoryBrokerRepository::with_history_limit(limit),
        None => InMemoryBrokerRepository::new(),
    });
    if let Some(limit) = args.history_limit {
        tracing::info!("History limited to the most recent {} messages", limit);
    }

    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let clock = Arc::new(SystemClock);
    let sequencer = Arc::new(Sequencer::new());

    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
        sequencer.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        sequencer.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock,
        sequencer.clone(),
    ));
    let get_room_state_usecase = Arc::new(GetRoomStateUseCase::new(repository, sequencer));

    let server = Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        send_message_usecase,
        get_room_state_usecase,
        args.send_queue_capacity,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
