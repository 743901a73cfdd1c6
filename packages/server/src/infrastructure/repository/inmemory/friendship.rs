//! InMemory Friendship Repository 実装

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Friendship, FriendshipRepository, RepositoryError, UserId};

/// インメモリ Friendship Repository 実装
///
/// ダイレクトチャットのリンクを双方向（1 方向につき 1 エントリ）で
/// 保持します。
pub struct InMemoryFriendshipRepository {
    friendships: Arc<Mutex<Vec<Friendship>>>,
}

impl InMemoryFriendshipRepository {
    /// 新しい InMemoryFriendshipRepository を作成
    pub fn new() -> Self {
        Self {
            friendships: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for InMemoryFriendshipRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FriendshipRepository for InMemoryFriendshipRepository {
    async fn add_pair(&self, pair: [Friendship; 2]) -> Result<bool, RepositoryError> {
        let mut friendships = self.friendships.lock().await;
        let [forward, backward] = pair;
        let exists = friendships.iter().any(|f| {
            (f.user_id == forward.user_id && f.friend_id == forward.friend_id)
                || (f.user_id == backward.user_id && f.friend_id == backward.friend_id)
        });
        if exists {
            return Ok(false);
        }
        friendships.push(forward);
        friendships.push(backward);
        Ok(true)
    }

    async fn exists_between(&self, user_a: &UserId, user_b: &UserId) -> bool {
        let friendships = self.friendships.lock().await;
        friendships.iter().any(|f| {
            (&f.user_id == user_a && &f.friend_id == user_b)
                || (&f.user_id == user_b && &f.friend_id == user_a)
        })
    }

    async fn friendships_of(&self, user_id: &UserId) -> Vec<Friendship> {
        let friendships = self.friendships.lock().await;
        friendships
            .iter()
            .filter(|f| &f.user_id == user_id)
            .cloned()
            .collect()
    }
}
