//! Idobata chat server: group rooms, direct messages, and real-time
//! presence over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server
//! cargo run --bin idobata-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;

use idobata_server::{
    domain::{OnlineUserIndex, RoomChannelIndex},
    infrastructure::{
        event_pusher::WebSocketEventPusher,
        repository::{
            InMemoryBlockRepository, InMemoryDirectMessageRepository,
            InMemoryFriendshipRepository, InMemoryRoomMessageRepository, InMemoryRoomRepository,
            InMemoryUserRepository,
        },
    },
    ui::{Server, state::AppState},
    usecase::{
        DisconnectConnectionUseCase, IdentifyUserUseCase, JoinRoomUseCase,
        RelayDirectMessageUseCase, RelayRoomEventUseCase, RelayRoomInviteUseCase,
    },
};
use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Chat server with rooms, direct messages and presence", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. Presence indices + EventPusher
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Create repositories (in-memory database)
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let room_repository = Arc::new(InMemoryRoomRepository::new());
    let room_message_repository = Arc::new(InMemoryRoomMessageRepository::new());
    let direct_message_repository = Arc::new(InMemoryDirectMessageRepository::new());
    let block_repository = Arc::new(InMemoryBlockRepository::new());
    let friendship_repository = Arc::new(InMemoryFriendshipRepository::new());

    // 2. Create the presence indices (server-lifetime, never global) and
    //    the EventPusher (WebSocket implementation)
    let online_users = Arc::new(Mutex::new(OnlineUserIndex::new()));
    let room_channels = Arc::new(Mutex::new(RoomChannelIndex::new()));
    let event_pusher = Arc::new(WebSocketEventPusher::new());

    // 3. Create UseCases
    let identify_user_usecase = Arc::new(IdentifyUserUseCase::new(
        online_users.clone(),
        event_pusher.clone(),
    ));
    let disconnect_connection_usecase = Arc::new(DisconnectConnectionUseCase::new(
        online_users.clone(),
        room_channels.clone(),
        event_pusher.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        room_channels.clone(),
        event_pusher.clone(),
    ));
    let relay_direct_message_usecase = Arc::new(RelayDirectMessageUseCase::new(
        online_users.clone(),
        event_pusher.clone(),
    ));
    let relay_room_event_usecase = Arc::new(RelayRoomEventUseCase::new(
        room_channels.clone(),
        event_pusher.clone(),
    ));
    let relay_room_invite_usecase = Arc::new(RelayRoomInviteUseCase::new(
        user_repository.clone(),
        online_users.clone(),
        event_pusher.clone(),
    ));

    // 4. Assemble the application state
    let state = AppState {
        event_pusher,
        identify_user_usecase,
        disconnect_connection_usecase,
        join_room_usecase,
        relay_direct_message_usecase,
        relay_room_event_usecase,
        relay_room_invite_usecase,
        user_repository,
        room_repository,
        room_message_repository,
        direct_message_repository,
        block_repository,
        friendship_repository,
    };

    // 5. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
