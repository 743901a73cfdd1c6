//! HTTP API request/response DTOs for the chat application.
//!
//! Field names follow the JSON contract of the existing front end
//! (camelCase), timestamps are ISO 8601 strings in JST.

use serde::{Deserialize, Serialize};

use idobata_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::entity::{
    Block, DirectMessage, Friendship, FriendshipStatus, MessageKind, Room, RoomMessage, User,
};

// ========================================
// Requests
// ========================================

/// Body of `POST /api/register`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
}

/// Body of `POST /api/user/find`
#[derive(Debug, Clone, Deserialize)]
pub struct FindUserRequest {
    pub email: String,
}

/// Body of `POST /api/rooms`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Body of `PATCH /api/rooms/{roomId}`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoomRequest {
    pub name: String,
}

/// Body of `POST /api/rooms/{roomId}/invite`
#[derive(Debug, Clone, Deserialize)]
pub struct InviteUserRequest {
    pub email: String,
}

/// Body of `POST /api/rooms/{roomId}/messages`
#[derive(Debug, Clone, Deserialize)]
pub struct PostRoomMessageRequest {
    pub content: String,
    /// "user" (default) or "system"
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Body of `POST /api/direct-messages`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDirectMessageRequest {
    pub receiver_id: String,
    pub content: String,
}

/// Body of `POST /api/direct-chats`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectChatRequest {
    pub user_id: String,
}

/// Body of `POST /api/blocks`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockRequest {
    pub blocked_user_id: String,
}

// ========================================
// Responses
// ========================================

/// Simple acknowledgement body: `{"message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// User representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String, // ISO 8601
}

/// Room representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub participants: Vec<String>,
    pub created_at: String, // ISO 8601
}

/// Room message representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessageDto {
    pub id: String,
    pub room_id: String,
    pub sender_id: Option<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String, // ISO 8601
}

/// Direct message representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageDto {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub read: bool,
    pub created_at: String, // ISO 8601
}

/// Block representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDto {
    pub user_id: String,
    pub blocked_user_id: String,
    pub created_at: String, // ISO 8601
}

/// Friendship (direct chat link) representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipDto {
    pub user_id: String,
    pub friend_id: String,
    pub status: String,
    pub created_at: String, // ISO 8601
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_string(),
            username: user.username,
            email: user.email.as_str().to_string(),
            created_at: timestamp_to_jst_rfc3339(user.created_at.value()),
        }
    }
}

impl From<Room> for RoomDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id.into_string(),
            name: room.name.as_str().to_string(),
            description: room.description,
            created_by: room.created_by.into_string(),
            participants: room
                .participants
                .into_iter()
                .map(|p| p.into_string())
                .collect(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        }
    }
}

impl From<RoomMessage> for RoomMessageDto {
    fn from(message: RoomMessage) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            room_id: message.room_id.into_string(),
            sender_id: message.sender_id.map(|s| s.into_string()),
            content: message.content.into_string(),
            kind: match message.kind {
                MessageKind::User => "user".to_string(),
                MessageKind::System => "system".to_string(),
            },
            created_at: timestamp_to_jst_rfc3339(message.created_at.value()),
        }
    }
}

impl From<DirectMessage> for DirectMessageDto {
    fn from(message: DirectMessage) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            sender_id: message.sender_id.into_string(),
            receiver_id: message.receiver_id.into_string(),
            content: message.content.into_string(),
            read: message.read,
            created_at: timestamp_to_jst_rfc3339(message.created_at.value()),
        }
    }
}

impl From<Block> for BlockDto {
    fn from(block: Block) -> Self {
        Self {
            user_id: block.user_id.into_string(),
            blocked_user_id: block.blocked_user_id.into_string(),
            created_at: timestamp_to_jst_rfc3339(block.created_at.value()),
        }
    }
}

impl From<Friendship> for FriendshipDto {
    fn from(friendship: Friendship) -> Self {
        Self {
            user_id: friendship.user_id.into_string(),
            friend_id: friendship.friend_id.into_string(),
            status: match friendship.status {
                FriendshipStatus::Pending => "pending".to_string(),
                FriendshipStatus::Accepted => "accepted".to_string(),
                FriendshipStatus::Rejected => "rejected".to_string(),
                FriendshipStatus::Blocked => "blocked".to_string(),
            },
            created_at: timestamp_to_jst_rfc3339(friendship.created_at.value()),
        }
    }
}
