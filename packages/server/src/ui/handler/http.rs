//! HTTP API endpoint handlers.
//!
//! Thin wrappers over the repository layer: parse, authorize against the
//! caller's identity (see [`AuthenticatedUser`]), read or write, convert to
//! DTOs. None of these handlers emit socket events — the live-update cue
//! for a write is emitted by the client over its own socket, independently
//! of the durable write here.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use idobata_shared::time::get_jst_timestamp;

use crate::{
    domain::{
        Block, BlockRepository, DirectMessage, DirectMessageRepository, Email, Friendship,
        FriendshipRepository, MessageContent, MessageIdFactory, RepositoryError, Room,
        RoomIdFactory, RoomMessage, RoomMessageRepository, RoomName, RoomRepository, Timestamp,
        User, UserId, UserIdFactory, UserRepository,
    },
    infrastructure::dto::http::{
        BlockDto, CreateBlockRequest, CreateDirectChatRequest, CreateRoomRequest,
        DirectMessageDto, FindUserRequest, FriendshipDto, InviteUserRequest, MessageResponse,
        PostDirectMessageRequest, PostRoomMessageRequest, RegisterRequest, RoomDto,
        RoomMessageDto, UpdateRoomRequest, UserDto,
    },
    ui::{auth::AuthenticatedUser, state::AppState},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// ========================================
// Users
// ========================================

/// Register a new user (POST /api/register)
///
/// Credentials are handled by the external authentication layer; only the
/// profile is stored here.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), StatusCode> {
    if req.username.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let email = Email::new(req.email).map_err(|_| StatusCode::BAD_REQUEST)?;

    let user = User::new(
        UserIdFactory::generate().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        req.username,
        email,
        Timestamp::new(get_jst_timestamp()),
    );

    state
        .user_repository
        .add_user(user.clone())
        .await
        .map_err(|e| match e {
            RepositoryError::EmailAlreadyRegistered(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        })?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Find a user by email (POST /api/user/find)
pub async fn find_user(
    _auth: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<FindUserRequest>,
) -> Result<Json<UserDto>, StatusCode> {
    let email = Email::new(req.email).map_err(|_| StatusCode::BAD_REQUEST)?;
    let user = state
        .user_repository
        .find_by_email(&email)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;
    Ok(Json(user.into()))
}

/// List all users except the caller (GET /api/users)
pub async fn list_users(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<UserDto>> {
    let users = state.user_repository.list_users_excluding(&caller).await;
    Json(users.into_iter().map(UserDto::from).collect())
}

// ========================================
// Rooms
// ========================================

/// Create a room (POST /api/rooms). The caller becomes creator and first
/// participant.
pub async fn create_room(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDto>), StatusCode> {
    let name = RoomName::new(req.name).map_err(|_| StatusCode::BAD_REQUEST)?;

    let room = Room::new(
        RoomIdFactory::generate().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        name,
        req.description,
        caller,
        Timestamp::new(get_jst_timestamp()),
    );

    state
        .room_repository
        .add_room(room.clone())
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(room.into())))
}

/// List the rooms the caller participates in (GET /api/rooms)
pub async fn get_rooms(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<RoomDto>> {
    let rooms = state.room_repository.rooms_for_user(&caller).await;
    Json(rooms.into_iter().map(RoomDto::from).collect())
}

/// Get room detail (GET /api/rooms/{room_id}); participants only
pub async fn get_room_detail(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDto>, StatusCode> {
    let room = find_room(&state, &room_id).await?;
    if !room.is_participant(&caller) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(room.into()))
}

/// Rename a room (PATCH /api/rooms/{room_id}); creator only.
///
/// A non-creator gets 404, not 403: the original API does not reveal
/// whether the room exists to callers who do not own it.
pub async fn update_room(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(req): Json<UpdateRoomRequest>,
) -> Result<Json<RoomDto>, StatusCode> {
    let name = RoomName::new(req.name).map_err(|_| StatusCode::BAD_REQUEST)?;

    let room = find_room(&state, &room_id).await?;
    if !room.is_creator(&caller) {
        return Err(StatusCode::NOT_FOUND);
    }

    state
        .room_repository
        .rename_room(&room.id, name)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let updated = find_room(&state, &room_id).await?;
    Ok(Json(updated.into()))
}

/// Delete a room (DELETE /api/rooms/{room_id}); creator only
pub async fn delete_room(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<MessageResponse>, StatusCode> {
    let room = find_room(&state, &room_id).await?;
    if !room.is_creator(&caller) {
        return Err(StatusCode::NOT_FOUND);
    }

    state
        .room_repository
        .delete_room(&room.id)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(MessageResponse::new("Room deleted successfully")))
}

/// Invite a user by email (POST /api/rooms/{room_id}/invite)
pub async fn invite_user(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(req): Json<InviteUserRequest>,
) -> Result<Json<MessageResponse>, StatusCode> {
    let email = Email::new(req.email).map_err(|_| StatusCode::BAD_REQUEST)?;

    let room = find_room(&state, &room_id).await?;
    if !room.is_participant(&caller) {
        return Err(StatusCode::FORBIDDEN);
    }

    let invited = state
        .user_repository
        .find_by_email(&email)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    state
        .room_repository
        .add_participant(&room.id, invited.id)
        .await
        .map_err(|e| match e {
            RepositoryError::AlreadyParticipant(_) => StatusCode::CONFLICT,
            _ => StatusCode::NOT_FOUND,
        })?;

    Ok(Json(MessageResponse::new("User invited successfully")))
}

/// Leave a room (POST /api/rooms/{room_id}/leave)
pub async fn leave_room(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<MessageResponse>, StatusCode> {
    let room = find_room(&state, &room_id).await?;

    state
        .room_repository
        .remove_participant(&room.id, &caller)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(MessageResponse::new("Left room successfully")))
}

/// Remove a participant (DELETE /api/rooms/{room_id}/participants/{participant_id});
/// creator only
pub async fn remove_participant(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path((room_id, participant_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, StatusCode> {
    let participant_id =
        UserId::new(participant_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    let room = find_room(&state, &room_id).await?;
    if !room.is_creator(&caller) {
        return Err(StatusCode::FORBIDDEN);
    }

    state
        .room_repository
        .remove_participant(&room.id, &participant_id)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(MessageResponse::new(
        "Participant removed successfully",
    )))
}

// ========================================
// Room messages
// ========================================

/// Get a room's message history (GET /api/rooms/{room_id}/messages);
/// participants only
pub async fn get_room_messages(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<RoomMessageDto>>, StatusCode> {
    let room = find_room(&state, &room_id).await?;
    if !room.is_participant(&caller) {
        return Err(StatusCode::FORBIDDEN);
    }

    let messages = state.room_message_repository.messages_for_room(&room.id).await;
    Ok(Json(messages.into_iter().map(RoomMessageDto::from).collect()))
}

/// Post a message to a room (POST /api/rooms/{room_id}/messages);
/// participants only. `type: "system"` stores a sender-less system notice.
pub async fn post_room_message(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(req): Json<PostRoomMessageRequest>,
) -> Result<(StatusCode, Json<RoomMessageDto>), StatusCode> {
    let content = MessageContent::new(req.content).map_err(|_| StatusCode::BAD_REQUEST)?;

    let room = find_room(&state, &room_id).await?;
    if !room.is_participant(&caller) {
        return Err(StatusCode::FORBIDDEN);
    }

    let message_id =
        MessageIdFactory::generate().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let created_at = Timestamp::new(get_jst_timestamp());

    let message = match req.kind.as_deref() {
        Some("system") => RoomMessage::system(message_id, room.id, content, created_at),
        _ => RoomMessage::user(message_id, room.id, caller, content, created_at),
    };

    state
        .room_message_repository
        .add_message(message.clone())
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

// ========================================
// Direct messages
// ========================================

/// Send a direct message (POST /api/direct-messages)
pub async fn post_direct_message(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<PostDirectMessageRequest>,
) -> Result<(StatusCode, Json<DirectMessageDto>), StatusCode> {
    let receiver_id = UserId::new(req.receiver_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let content = MessageContent::new(req.content).map_err(|_| StatusCode::BAD_REQUEST)?;

    let message = DirectMessage::new(
        MessageIdFactory::generate().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        caller,
        receiver_id,
        content,
        Timestamp::new(get_jst_timestamp()),
    );

    state
        .direct_message_repository
        .add_message(message.clone())
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// Get the conversation with another user, both directions
/// (GET /api/direct-messages/{user_id})
pub async fn get_direct_conversation(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<DirectMessageDto>>, StatusCode> {
    let other = UserId::new(user_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let messages = state
        .direct_message_repository
        .conversation(&caller, &other)
        .await;
    Ok(Json(messages.into_iter().map(DirectMessageDto::from).collect()))
}

/// Mark a sender's messages to the caller as read
/// (POST /api/direct-messages/{user_id}/read)
pub async fn mark_direct_messages_read(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, StatusCode> {
    let sender = UserId::new(user_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let marked = state
        .direct_message_repository
        .mark_conversation_read(&caller, &sender)
        .await;
    tracing::debug!("Marked {} direct messages as read", marked);
    Ok(Json(MessageResponse::new("Messages marked as read")))
}

/// Unread direct-message counts grouped by sender
/// (GET /api/direct-messages/unread)
pub async fn get_unread_counts(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> Json<HashMap<String, usize>> {
    let counts = state.direct_message_repository.unread_counts(&caller).await;
    Json(
        counts
            .into_iter()
            .map(|(sender, count)| (sender.into_string(), count))
            .collect(),
    )
}

// ========================================
// Direct chats (friendships)
// ========================================

/// List the caller's direct chats (GET /api/direct-chats)
pub async fn get_direct_chats(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<FriendshipDto>> {
    let friendships = state.friendship_repository.friendships_of(&caller).await;
    Json(friendships.into_iter().map(FriendshipDto::from).collect())
}

/// Open a direct chat with another user (POST /api/direct-chats).
///
/// Creates an accepted friendship in both directions; idempotent per pair.
pub async fn create_direct_chat(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDirectChatRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), StatusCode> {
    let other = UserId::new(req.user_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    // Validate the target user exists
    state
        .user_repository
        .find_by_id(&other)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let created_at = Timestamp::new(get_jst_timestamp());
    let pair = [
        Friendship::accepted(caller.clone(), other.clone(), created_at),
        Friendship::accepted(other, caller, created_at),
    ];

    let created = state
        .friendship_repository
        .add_pair(pair)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if created {
        Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("Direct chat created successfully")),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(MessageResponse::new("Direct chat already exists")),
        ))
    }
}

// ========================================
// Blocks
// ========================================

/// Block a user (POST /api/blocks)
pub async fn create_block(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBlockRequest>,
) -> Result<(StatusCode, Json<BlockDto>), StatusCode> {
    let blocked = UserId::new(req.blocked_user_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    let block = Block::new(caller, blocked, Timestamp::new(get_jst_timestamp()));

    state
        .block_repository
        .add_block(block.clone())
        .await
        .map_err(|e| match e {
            RepositoryError::AlreadyBlocked(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        })?;

    Ok((StatusCode::CREATED, Json(block.into())))
}

/// Unblock a user (DELETE /api/blocks/{user_id})
pub async fn delete_block(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, StatusCode> {
    let blocked = UserId::new(user_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    state
        .block_repository
        .remove_block(&caller, &blocked)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(MessageResponse::new("User unblocked successfully")))
}

/// List the caller's blocks (GET /api/blocks)
pub async fn get_blocks(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<BlockDto>> {
    let blocks = state.block_repository.blocks_for_user(&caller).await;
    Json(blocks.into_iter().map(BlockDto::from).collect())
}

// ========================================
// Helpers
// ========================================

/// Parse a path room id and load the room; 400 on malformed id, 404 when
/// the room does not exist.
async fn find_room(state: &Arc<AppState>, room_id: &str) -> Result<Room, StatusCode> {
    let room_id = crate::domain::RoomId::new(room_id.to_string())
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    state
        .room_repository
        .find_room(&room_id)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)
}
