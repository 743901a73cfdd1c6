//! InMemory User Repository 実装

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Email, RepositoryError, User, UserId, UserRepository};

/// インメモリ User Repository 実装
///
/// メールアドレスの一意性をここで保証します（ドキュメント DB の
/// unique index に相当）。
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// 新しい InMemoryUserRepository を作成
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn add_user(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::EmailAlreadyRegistered(
                user.email.as_str().to_string(),
            ));
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<User, RepositoryError> {
        let users = self.users.lock().await;
        users
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::UserNotFound(user_id.as_str().to_string()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError> {
        let users = self.users.lock().await;
        users
            .values()
            .find(|u| &u.email == email)
            .cloned()
            .ok_or_else(|| RepositoryError::UserNotFound(email.as_str().to_string()))
    }

    async fn list_users_excluding(&self, user_id: &UserId) -> Vec<User> {
        let users = self.users.lock().await;
        let mut result: Vec<User> = users
            .values()
            .filter(|u| &u.id != user_id)
            .cloned()
            .collect();
        // Sort by id for consistent ordering
        result.sort_by(|a, b| a.id.cmp(&b.id));
        result
    }
}
