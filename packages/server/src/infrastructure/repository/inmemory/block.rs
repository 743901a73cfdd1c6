//! InMemory Block Repository 実装

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Block, BlockRepository, RepositoryError, UserId};

/// インメモリ Block Repository 実装
///
/// 同一ペアのブロックは一意です（ドキュメント DB の compound unique
/// index に相当）。
pub struct InMemoryBlockRepository {
    blocks: Arc<Mutex<Vec<Block>>>,
}

impl InMemoryBlockRepository {
    /// 新しい InMemoryBlockRepository を作成
    pub fn new() -> Self {
        Self {
            blocks: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for InMemoryBlockRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockRepository for InMemoryBlockRepository {
    async fn add_block(&self, block: Block) -> Result<(), RepositoryError> {
        let mut blocks = self.blocks.lock().await;
        if blocks
            .iter()
            .any(|b| b.user_id == block.user_id && b.blocked_user_id == block.blocked_user_id)
        {
            return Err(RepositoryError::AlreadyBlocked(
                block.blocked_user_id.as_str().to_string(),
            ));
        }
        blocks.push(block);
        Ok(())
    }

    async fn remove_block(
        &self,
        user_id: &UserId,
        blocked_user_id: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut blocks = self.blocks.lock().await;
        let before = blocks.len();
        blocks.retain(|b| !(&b.user_id == user_id && &b.blocked_user_id == blocked_user_id));
        if blocks.len() == before {
            return Err(RepositoryError::BlockNotFound(
                blocked_user_id.as_str().to_string(),
            ));
        }
        Ok(())
    }

    async fn blocks_for_user(&self, user_id: &UserId) -> Vec<Block> {
        let blocks = self.blocks.lock().await;
        blocks
            .iter()
            .filter(|b| &b.user_id == user_id)
            .cloned()
            .collect()
    }
}
