//! WebSocket connection handlers: the transport loop and the event router.
//!
//! Each accepted connection gets a server-generated `ConnectionId` and an
//! unbounded channel registered with the `EventPusher`. Inbound frames are
//! processed strictly in arrival order by this connection's receive loop;
//! there is no ordering across connections. Frames that do not decode into
//! the closed `ClientEvent` vocabulary are answered with an `error` frame.
//!
//! ## Trust boundary
//!
//! `user:connect` and `send-direct-message` carry client-asserted user
//! ids. The socket layer does not verify them against the authenticated
//! session: any connection can claim any user id for presence and DM
//! targeting purposes. Authorization for reading and writing the actual
//! data is enforced exclusively by the REST layer.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, Email, EventPusher, RoomId, UserId},
    infrastructure::dto::websocket::{
        ClientEvent, ErrorPayload, NewMessagePayload, RoomInvitePayload, ServerEvent,
    },
    ui::state::AppState,
};

/// Text of the synthetic system notice broadcast on `join-room`
const JOIN_NOTICE_TEXT: &str = "A new user joined the room";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This function handles the outbound event flow: events relayed by other
/// connections (via the rx channel) are sent to this client's WebSocket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the event to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id =
        ConnectionIdFactory::generate().expect("Failed to generate ConnectionId");

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .event_pusher
        .register_connection(connection_id.clone(), tx)
        .await;
    tracing::info!("Socket connected, ID: {}", connection_id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Receive events from this client, strictly in arrival order
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => {
                        route_event(&state_clone, &connection_id_clone, event).await;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Rejecting malformed frame from '{}': {}",
                            connection_id_clone,
                            e
                        );
                        push_error(
                            &state_clone,
                            &connection_id_clone,
                            format!("malformed event frame: {}", e),
                        )
                        .await;
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Registry cleanup; broadcast presence only if an entry was removed
    if let Some(online) = state
        .disconnect_connection_usecase
        .execute(&connection_id)
        .await
    {
        let frame = users_online_frame(online);
        if let Err(e) = state
            .disconnect_connection_usecase
            .broadcast_presence(&frame)
            .await
        {
            tracing::warn!("Failed to broadcast users:online: {}", e);
        }
    }
    tracing::info!("Socket disconnected, ID: {}", connection_id);
}

/// Dispatch one inbound event. The match is exhaustive over the closed
/// event vocabulary; adding a variant without a route is a compile error.
async fn route_event(state: &Arc<AppState>, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::UserConnect(user_id) => {
            let user_id = match UserId::new(user_id) {
                Ok(id) => id,
                Err(e) => {
                    push_error(state, connection_id, format!("invalid user id: {}", e)).await;
                    return;
                }
            };

            let online = state
                .identify_user_usecase
                .execute(user_id, connection_id.clone())
                .await;

            let frame = users_online_frame(online);
            if let Err(e) = state.identify_user_usecase.broadcast_presence(&frame).await {
                tracing::warn!("Failed to broadcast users:online: {}", e);
            }
        }

        ClientEvent::JoinRoom(room_id) => {
            let room_id = match RoomId::new(room_id) {
                Ok(id) => id,
                Err(e) => {
                    push_error(state, connection_id, format!("invalid room id: {}", e)).await;
                    return;
                }
            };

            state
                .join_room_usecase
                .execute(connection_id.clone(), room_id.clone())
                .await;

            // Synthetic system notice; the joiner is already subscribed and
            // receives it too
            let notice = ServerEvent::NewMessage(NewMessagePayload {
                sender: "system".to_string(),
                text: JOIN_NOTICE_TEXT.to_string(),
                room_id: room_id.as_str().to_string(),
            });
            let frame = serde_json::to_string(&notice).unwrap();
            if let Err(e) = state
                .join_room_usecase
                .broadcast_to_room(&room_id, &frame)
                .await
            {
                tracing::warn!("Failed to broadcast join notice: {}", e);
            }
        }

        ClientEvent::SendMessage(payload) => {
            // The authoritative send path is the REST call; this event is a
            // transport-level echo kept for future extension.
            tracing::info!("Received send-message echo: {}", payload);
        }

        ClientEvent::SendDirectMessage(payload) => {
            let sender_id = UserId::new(payload.sender_id.clone());
            let receiver_id = UserId::new(payload.receiver_id.clone());
            let (sender_id, receiver_id) = match (sender_id, receiver_id) {
                (Ok(s), Ok(r)) => (s, r),
                (Err(e), _) | (_, Err(e)) => {
                    push_error(state, connection_id, format!("invalid user id: {}", e)).await;
                    return;
                }
            };

            let relay = ServerEvent::NewDirectMessage(payload);
            let frame = serde_json::to_string(&relay).unwrap();
            if let Err(e) = state
                .relay_direct_message_usecase
                .execute(&sender_id, &receiver_id, &frame)
                .await
            {
                tracing::warn!("Failed to relay direct message cue: {}", e);
            }
        }

        ClientEvent::UserLeft(payload) => {
            let room_id = match RoomId::new(payload.room_id.clone()) {
                Ok(id) => id,
                Err(e) => {
                    push_error(state, connection_id, format!("invalid room id: {}", e)).await;
                    return;
                }
            };

            let relay = ServerEvent::UserLeft(payload);
            let frame = serde_json::to_string(&relay).unwrap();
            if let Err(e) = state
                .relay_room_event_usecase
                .execute(&room_id, &frame)
                .await
            {
                tracing::warn!("Failed to relay user-left: {}", e);
            }
        }

        ClientEvent::InviteUser(payload) => {
            let email = match Email::new(payload.email.clone()) {
                Ok(email) => email,
                Err(e) => {
                    push_error(state, connection_id, format!("invalid email: {}", e)).await;
                    return;
                }
            };

            let relay = ServerEvent::RoomInvite(RoomInvitePayload {
                room_id: payload.room_id,
            });
            let frame = serde_json::to_string(&relay).unwrap();
            if let Err(e) = state
                .relay_room_invite_usecase
                .execute(&email, &frame)
                .await
            {
                tracing::warn!("Failed to relay room invite: {}", e);
            }
        }
    }
}

/// Serialize the current online set as a `users:online` frame
fn users_online_frame(online: Vec<UserId>) -> String {
    let user_ids = online.into_iter().map(|id| id.into_string()).collect();
    serde_json::to_string(&ServerEvent::UsersOnline(user_ids)).unwrap()
}

/// Push an `error` frame back to the offending connection
async fn push_error(state: &Arc<AppState>, connection_id: &ConnectionId, message: String) {
    let frame = serde_json::to_string(&ServerEvent::Error(ErrorPayload { message })).unwrap();
    if let Err(e) = state.event_pusher.push_to(connection_id, &frame).await {
        tracing::debug!(
            "Could not deliver error frame to '{}': {}",
            connection_id,
            e
        );
    }
}
