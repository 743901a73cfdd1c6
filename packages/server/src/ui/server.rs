//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        create_block, create_direct_chat, create_room, delete_block, delete_room, find_user,
        get_blocks, get_direct_chats, get_direct_conversation, get_room_detail,
        get_room_messages, get_rooms, get_unread_counts, health_check, invite_user, leave_room,
        list_users,
        mark_direct_messages_read, post_direct_message, post_room_message, register,
        remove_participant, update_room, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Chat server: WebSocket relay plus the REST API
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// Shared application state（UseCase と Repository の束）
    state: AppState,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `state` - Fully wired application state (use cases, repositories,
    ///   event pusher)
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Run the chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(self.state);

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/register", post(register))
            .route("/api/users", get(list_users))
            .route("/api/user/find", post(find_user))
            .route("/api/rooms", get(get_rooms).post(create_room))
            .route(
                "/api/rooms/{room_id}",
                get(get_room_detail).patch(update_room).delete(delete_room),
            )
            .route("/api/rooms/{room_id}/invite", post(invite_user))
            .route("/api/rooms/{room_id}/leave", post(leave_room))
            .route(
                "/api/rooms/{room_id}/participants/{participant_id}",
                delete(remove_participant),
            )
            .route(
                "/api/rooms/{room_id}/messages",
                get(get_room_messages).post(post_room_message),
            )
            .route("/api/direct-messages", post(post_direct_message))
            .route("/api/direct-messages/unread", get(get_unread_counts))
            .route(
                "/api/direct-messages/{user_id}",
                get(get_direct_conversation),
            )
            .route(
                "/api/direct-messages/{user_id}/read",
                post(mark_direct_messages_read),
            )
            .route(
                "/api/direct-chats",
                get(get_direct_chats).post(create_direct_chat),
            )
            .route("/api/blocks", get(get_blocks).post(create_block))
            .route("/api/blocks/{user_id}", delete(delete_block))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
