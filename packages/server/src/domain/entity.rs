//! Core domain models for the chat application.

use serde::{Deserialize, Serialize};

use super::{
    error::RoomError,
    value_object::{Email, MessageContent, MessageId, RoomId, RoomName, Timestamp, UserId},
};

/// Represents a registered user.
///
/// Credentials are handled by the external authentication layer; this
/// entity carries no secret material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub username: String,
    /// Email address (unique across users)
    pub email: Email,
    /// Timestamp when the user registered
    pub created_at: Timestamp,
}

impl User {
    /// Create a new user
    pub fn new(id: UserId, username: String, email: Email, created_at: Timestamp) -> Self {
        Self {
            id,
            username,
            email,
            created_at,
        }
    }
}

/// Represents a group chat room with its participant list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Room name
    pub name: RoomName,
    /// Optional room description
    pub description: Option<String>,
    /// User who created the room
    pub created_by: UserId,
    /// Participant user ids (order is not significant)
    pub participants: Vec<UserId>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new room. The creator is always the first participant.
    pub fn new(
        id: RoomId,
        name: RoomName,
        description: Option<String>,
        created_by: UserId,
        created_at: Timestamp,
    ) -> Self {
        let participants = vec![created_by.clone()];
        Self {
            id,
            name,
            description,
            created_by,
            participants,
            created_at,
        }
    }

    /// Add a participant to the room
    ///
    /// # Errors
    ///
    /// Returns `RoomError::AlreadyParticipant` if the user is already in the room
    pub fn add_participant(&mut self, user_id: UserId) -> Result<(), RoomError> {
        if self.is_participant(&user_id) {
            return Err(RoomError::AlreadyParticipant(user_id.into_string()));
        }
        self.participants.push(user_id);
        Ok(())
    }

    /// Remove a participant from the room by id. Removing a user who is not
    /// a participant is a no-op.
    pub fn remove_participant(&mut self, user_id: &UserId) {
        self.participants.retain(|p| p != user_id);
    }

    /// Check whether a user participates in the room
    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// Check whether a user created the room
    pub fn is_creator(&self, user_id: &UserId) -> bool {
        &self.created_by == user_id
    }
}

/// Kind of a room message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Written by a user
    User,
    /// Generated by the application (join/leave/removal notices)
    System,
}

/// Represents a persisted message in a group room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomMessage {
    /// Message identifier
    pub id: MessageId,
    /// Room the message belongs to
    pub room_id: RoomId,
    /// Sender's user id; `None` for system messages
    pub sender_id: Option<UserId>,
    /// Message content
    pub content: MessageContent,
    /// Message kind
    pub kind: MessageKind,
    /// Timestamp when the message was created
    pub created_at: Timestamp,
}

impl RoomMessage {
    /// Create a new user message
    pub fn user(
        id: MessageId,
        room_id: RoomId,
        sender_id: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            sender_id: Some(sender_id),
            content,
            kind: MessageKind::User,
            created_at,
        }
    }

    /// Create a new system message (no sender)
    pub fn system(
        id: MessageId,
        room_id: RoomId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            sender_id: None,
            content,
            kind: MessageKind::System,
            created_at,
        }
    }
}

/// Represents a persisted direct message between two users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectMessage {
    /// Message identifier
    pub id: MessageId,
    /// Sender's user id
    pub sender_id: UserId,
    /// Receiver's user id
    pub receiver_id: UserId,
    /// Message content
    pub content: MessageContent,
    /// Whether the receiver has read the message
    pub read: bool,
    /// Timestamp when the message was created
    pub created_at: Timestamp,
}

impl DirectMessage {
    /// Create a new unread direct message
    pub fn new(
        id: MessageId,
        sender_id: UserId,
        receiver_id: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sender_id,
            receiver_id,
            content,
            read: false,
            created_at,
        }
    }

    /// Mark the message as read by the receiver
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

/// Represents one user blocking another. A pair is unique: a user can
/// block another user at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// The blocking user
    pub user_id: UserId,
    /// The blocked user
    pub blocked_user_id: UserId,
    /// Timestamp when the block was created
    pub created_at: Timestamp,
}

impl Block {
    /// Create a new block
    pub fn new(user_id: UserId, blocked_user_id: UserId, created_at: Timestamp) -> Self {
        Self {
            user_id,
            blocked_user_id,
            created_at,
        }
    }
}

/// Status of a friendship (direct chat link)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
    Blocked,
}

/// Represents a direct chat link from one user to another.
///
/// Links are stored bidirectionally: opening a direct chat creates one
/// accepted friendship per direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    /// Owning user
    pub user_id: UserId,
    /// The other user
    pub friend_id: UserId,
    /// Friendship status
    pub status: FriendshipStatus,
    /// Timestamp when the friendship was created
    pub created_at: Timestamp,
}

impl Friendship {
    /// Create a new accepted friendship
    pub fn accepted(user_id: UserId, friend_id: UserId, created_at: Timestamp) -> Self {
        Self {
            user_id,
            friend_id,
            status: FriendshipStatus::Accepted,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::{MessageIdFactory, RoomIdFactory};

    fn test_room(creator: &str) -> Room {
        Room::new(
            RoomIdFactory::generate().unwrap(),
            RoomName::new("general".to_string()).unwrap(),
            Some("daily chatter".to_string()),
            UserId::new(creator.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_room_new_creator_is_participant() {
        // テスト項目: 新しい Room の参加者リストに作成者が含まれる
        // given (前提条件):
        let creator = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let room = test_room("alice");

        // then (期待する結果):
        assert_eq!(room.participants.len(), 1);
        assert!(room.is_participant(&creator));
        assert!(room.is_creator(&creator));
    }

    #[test]
    fn test_room_add_participant_success() {
        // テスト項目: 参加者を追加できる
        // given (前提条件):
        let mut room = test_room("alice");
        let bob = UserId::new("bob".to_string()).unwrap();

        // when (操作):
        let result = room.add_participant(bob.clone());

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(room.is_participant(&bob));
        assert_eq!(room.participants.len(), 2);
    }

    #[test]
    fn test_room_add_participant_duplicate() {
        // テスト項目: 既に参加しているユーザーの追加はエラーになる
        // given (前提条件):
        let mut room = test_room("alice");
        let bob = UserId::new("bob".to_string()).unwrap();
        room.add_participant(bob.clone()).unwrap();

        // when (操作):
        let result = room.add_participant(bob);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomError::AlreadyParticipant("bob".to_string()))
        );
        assert_eq!(room.participants.len(), 2);
    }

    #[test]
    fn test_room_remove_participant() {
        // テスト項目: 参加者を削除できる（存在しない参加者の削除は no-op）
        // given (前提条件):
        let mut room = test_room("alice");
        let bob = UserId::new("bob".to_string()).unwrap();
        room.add_participant(bob.clone()).unwrap();

        // when (操作):
        room.remove_participant(&bob);
        room.remove_participant(&UserId::new("charlie".to_string()).unwrap());

        // then (期待する結果):
        assert!(!room.is_participant(&bob));
        assert_eq!(room.participants.len(), 1);
    }

    #[test]
    fn test_room_message_system_has_no_sender() {
        // テスト項目: システムメッセージは送信者を持たない
        // given (前提条件):
        let room = test_room("alice");

        // when (操作):
        let message = RoomMessage::system(
            MessageIdFactory::generate().unwrap(),
            room.id.clone(),
            MessageContent::new("A new user joined the room".to_string()).unwrap(),
            Timestamp::new(2000),
        );

        // then (期待する結果):
        assert_eq!(message.sender_id, None);
        assert_eq!(message.kind, MessageKind::System);
    }

    #[test]
    fn test_direct_message_mark_read() {
        // テスト項目: ダイレクトメッセージを既読にできる
        // given (前提条件):
        let mut message = DirectMessage::new(
            MessageIdFactory::generate().unwrap(),
            UserId::new("alice".to_string()).unwrap(),
            UserId::new("bob".to_string()).unwrap(),
            MessageContent::new("hi".to_string()).unwrap(),
            Timestamp::new(3000),
        );
        assert!(!message.read);

        // when (操作):
        message.mark_read();

        // then (期待する結果):
        assert!(message.read);
    }
}
