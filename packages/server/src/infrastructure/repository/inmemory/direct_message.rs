//! InMemory Direct Message Repository 実装

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DirectMessage, DirectMessageRepository, RepositoryError, UserId};

/// インメモリ Direct Message Repository 実装
pub struct InMemoryDirectMessageRepository {
    messages: Arc<Mutex<Vec<DirectMessage>>>,
}

impl InMemoryDirectMessageRepository {
    /// 新しい InMemoryDirectMessageRepository を作成
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for InMemoryDirectMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectMessageRepository for InMemoryDirectMessageRepository {
    async fn add_message(&self, message: DirectMessage) -> Result<(), RepositoryError> {
        let mut messages = self.messages.lock().await;
        messages.push(message);
        Ok(())
    }

    async fn conversation(&self, user_a: &UserId, user_b: &UserId) -> Vec<DirectMessage> {
        let messages = self.messages.lock().await;
        let mut result: Vec<DirectMessage> = messages
            .iter()
            .filter(|m| {
                (&m.sender_id == user_a && &m.receiver_id == user_b)
                    || (&m.sender_id == user_b && &m.receiver_id == user_a)
            })
            .cloned()
            .collect();
        result.sort_by_key(|m| m.created_at);
        result
    }

    async fn mark_conversation_read(&self, receiver: &UserId, sender: &UserId) -> usize {
        let mut messages = self.messages.lock().await;
        let mut marked = 0;
        for message in messages.iter_mut() {
            if &message.receiver_id == receiver && &message.sender_id == sender && !message.read {
                message.mark_read();
                marked += 1;
            }
        }
        marked
    }

    async fn unread_counts(&self, receiver: &UserId) -> Vec<(UserId, usize)> {
        let messages = self.messages.lock().await;
        let mut counts: HashMap<UserId, usize> = HashMap::new();
        for message in messages.iter() {
            if &message.receiver_id == receiver && !message.read {
                *counts.entry(message.sender_id.clone()).or_insert(0) += 1;
            }
        }
        let mut result: Vec<(UserId, usize)> = counts.into_iter().collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }
}
