//! Domain factories for creating domain entities and value objects.

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, MessageId, RoomId, UserId},
};

/// Factory for generating UserId instances.
pub struct UserIdFactory;

impl UserIdFactory {
    /// Generate a new UserId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<UserId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        UserId::new(uuid.to_string())
    }
}

/// Factory for generating RoomId instances.
///
/// This factory encapsulates the logic for generating new room identifiers,
/// separating the generation concern from the validation logic in RoomId.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a new RoomId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        RoomId::new(uuid.to_string())
    }
}

/// Factory for generating ConnectionId instances.
///
/// A new id is generated for every accepted WebSocket connection; the value
/// is transport-scoped and never persisted.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        ConnectionId::new(uuid.to_string())
    }
}

/// Factory for generating MessageId instances.
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// Generate a new MessageId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<MessageId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        MessageId::new(uuid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_factory_generate() {
        // テスト項目: RoomIdFactory::generate() で UUID v4 形式の RoomId を生成できる
        // when (操作):
        let result = RoomIdFactory::generate();

        // then (期待する結果):
        assert!(result.is_ok());
        let room_id = result.unwrap();

        // UUID v4 形式であることを確認（長さと形式）
        assert_eq!(room_id.as_str().len(), 36); // UUID v4 の標準長（ハイフン含む）
    }

    #[test]
    fn test_connection_id_factory_generate_uniqueness() {
        // テスト項目: ConnectionIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let id1 = ConnectionIdFactory::generate().unwrap();
        let id2 = ConnectionIdFactory::generate().unwrap();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_message_id_factory_generate() {
        // テスト項目: MessageIdFactory::generate() で MessageId を生成できる
        // when (操作):
        let result = MessageIdFactory::generate();

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
