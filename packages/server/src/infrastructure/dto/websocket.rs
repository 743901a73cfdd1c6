//! WebSocket event DTOs for the chat application.
//!
//! Events travel as JSON frames with an `{"event": <name>, "data": <payload>}`
//! envelope. The inbound vocabulary is a closed enum: the router matches
//! exhaustively, and a frame that does not decode into `ClientEvent` is
//! answered with an outbound `error` frame instead of being silently
//! dropped.
//!
//! Wire names are part of the public contract consumed by existing
//! front-end clients (`user:connect`, `join-room`, `inviteUser`, ...), so
//! the serde renames below must not be changed casually.

use serde::{Deserialize, Serialize};

/// Inbound events emitted by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Presence registration with a client-asserted user id
    #[serde(rename = "user:connect")]
    UserConnect(String),

    /// Subscribe this connection to a room channel
    #[serde(rename = "join-room")]
    JoinRoom(String),

    /// Transport-level echo of a room message send. Logged only; the
    /// authoritative send path is the REST call.
    #[serde(rename = "send-message")]
    SendMessage(serde_json::Value),

    /// Cue that a direct message was sent; relayed to both parties
    #[serde(rename = "send-direct-message")]
    SendDirectMessage(DirectMessagePayload),

    /// Informational notice that a user left or was removed from a room
    #[serde(rename = "user-left")]
    UserLeft(UserLeftPayload),

    /// Cue that a user was invited to a room
    #[serde(rename = "inviteUser")]
    InviteUser(InviteUserPayload),
}

/// Outbound events pushed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full set of currently online user ids
    #[serde(rename = "users:online")]
    UsersOnline(Vec<String>),

    /// Refetch cue for a room channel
    #[serde(rename = "new-message")]
    NewMessage(NewMessagePayload),

    /// Refetch cue for a direct conversation
    #[serde(rename = "new-direct-message")]
    NewDirectMessage(DirectMessagePayload),

    /// Informational relay of a leave/removal notice
    #[serde(rename = "user-left")]
    UserLeft(UserLeftPayload),

    /// Cue that the receiving user was invited to a room
    #[serde(rename = "room-invite")]
    RoomInvite(RoomInvitePayload),

    /// Rejection of a malformed inbound frame
    #[serde(rename = "error")]
    Error(ErrorPayload),
}

/// Payload of `send-direct-message` / `new-direct-message`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessagePayload {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
}

/// Payload of `new-message`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessagePayload {
    pub sender: String,
    pub text: String,
    pub room_id: String,
}

/// Payload of `user-left`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftPayload {
    pub room_id: String,
    pub username: String,
    pub removed_by: String,
}

/// Payload of `inviteUser`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserPayload {
    pub room_id: String,
    pub email: String,
}

/// Payload of `room-invite`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInvitePayload {
    pub room_id: String,
}

/// Payload of `error`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}
