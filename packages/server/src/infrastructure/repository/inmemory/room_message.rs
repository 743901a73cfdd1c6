//! InMemory Room Message Repository 実装

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, RoomId, RoomMessage, RoomMessageRepository};

/// インメモリ Room Message Repository 実装
pub struct InMemoryRoomMessageRepository {
    messages: Arc<Mutex<Vec<RoomMessage>>>,
}

impl InMemoryRoomMessageRepository {
    /// 新しい InMemoryRoomMessageRepository を作成
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for InMemoryRoomMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomMessageRepository for InMemoryRoomMessageRepository {
    async fn add_message(&self, message: RoomMessage) -> Result<(), RepositoryError> {
        let mut messages = self.messages.lock().await;
        messages.push(message);
        Ok(())
    }

    async fn messages_for_room(&self, room_id: &RoomId) -> Vec<RoomMessage> {
        let messages = self.messages.lock().await;
        let mut result: Vec<RoomMessage> = messages
            .iter()
            .filter(|m| &m.room_id == room_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.created_at);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        MessageContent, MessageIdFactory, RoomIdFactory, Timestamp, UserId,
    };

    #[tokio::test]
    async fn test_messages_for_room_sorted_by_time() {
        // テスト項目: Room のメッセージ履歴が作成時刻順で返される
        // given (前提条件): 逆順で 2 件追加
        let repo = InMemoryRoomMessageRepository::new();
        let room_id = RoomIdFactory::generate().unwrap();
        let alice = UserId::new("alice".to_string()).unwrap();
        repo.add_message(RoomMessage::user(
            MessageIdFactory::generate().unwrap(),
            room_id.clone(),
            alice.clone(),
            MessageContent::new("second".to_string()).unwrap(),
            Timestamp::new(2000),
        ))
        .await
        .unwrap();
        repo.add_message(RoomMessage::user(
            MessageIdFactory::generate().unwrap(),
            room_id.clone(),
            alice,
            MessageContent::new("first".to_string()).unwrap(),
            Timestamp::new(1000),
        ))
        .await
        .unwrap();

        // when (操作):
        let result = repo.messages_for_room(&room_id).await;

        // then (期待する結果):
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].content.as_str(), "first");
        assert_eq!(result[1].content.as_str(), "second");
    }

    #[tokio::test]
    async fn test_messages_for_unknown_room_is_empty() {
        // テスト項目: メッセージのない Room の履歴は空
        // given (前提条件):
        let repo = InMemoryRoomMessageRepository::new();

        // when (操作):
        let result = repo
            .messages_for_room(&RoomIdFactory::generate().unwrap())
            .await;

        // then (期待する結果):
        assert!(result.is_empty());
    }
}
