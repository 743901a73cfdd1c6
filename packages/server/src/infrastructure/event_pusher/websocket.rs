//! WebSocket を使った EventPusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を接続単位で管理
//! - 接続へのイベント送信（push_to, broadcast, broadcast_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送信に
//! 使用します。これにより、「WebSocket の生成」と「イベントの送信」が
//! 分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、イベント送信

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPushError, EventPusher, PusherChannel};

/// WebSocket を使った EventPusher 実装
///
/// ## フィールド
///
/// - `connections`: 接続中の ConnectionId と対応する WebSocket sender のマップ
pub struct WebSocketEventPusher {
    /// 接続中のクライアントの WebSocket sender
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketEventPusher {
    /// 新しい WebSocketEventPusher を作成
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 登録済みの接続数を取得（テスト・デバッグ用）
    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }
}

impl Default for WebSocketEventPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection_id.clone(), sender);
        tracing::debug!("Connection '{}' registered to EventPusher", connection_id);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from EventPusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection_id) {
            sender
                .send(content.to_string())
                .map_err(|e| EventPushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to connection '{}'", connection_id);
            Ok(())
        } else {
            Err(EventPushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        for target in targets {
            if let Some(sender) = connections.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("Failed to push event to connection '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted event to connection '{}'", target);
                }
            } else {
                tracing::warn!(
                    "Connection '{}' not found during broadcast, skipping",
                    target
                );
            }
        }

        Ok(())
    }

    async fn broadcast_all(&self, content: &str) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        for (connection_id, sender) in connections.iter() {
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!(
                    "Failed to push event to connection '{}': {}",
                    connection_id,
                    e
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketEventPusher の基本的なイベント送信機能
    // - push_to: 特定の接続への送信
    // - broadcast: 複数接続への送信
    // - broadcast_all: 全接続への送信
    // - エラーハンドリング（存在しない接続）
    //
    // 【なぜこのテストが必要か】
    // - EventPusher は UseCase から呼ばれる通信層の中核
    // - プレゼンス通知は未識別の接続にも届く必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功／失敗ケース
    // 2. broadcast の部分失敗ケース
    // 3. broadcast_all が登録済みの全接続に届くケース
    // ========================================

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_connection(conn("c1"), tx).await;

        // when (操作):
        let result = pusher.push_to(&conn("c1"), "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();

        // when (操作):
        let result = pusher.push_to(&conn("nonexistent"), "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(EventPushError::ConnectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: ブロードキャスト時、一部の接続が存在しなくても成功する
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_connection(conn("c1"), tx).await;

        // when (操作):
        let result = pusher
            .broadcast(vec![conn("c1"), conn("nonexistent")], "Broadcast")
            .await;

        // then (期待する結果): ブロードキャストは部分失敗を許容
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Broadcast".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();

        // when (操作):
        let result = pusher.broadcast(vec![], "Event").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_every_connection() {
        // テスト項目: broadcast_all が登録済みの全接続に届く
        // given (前提条件): 識別済みかどうかに関わらず 2 つの接続を登録
        let pusher = WebSocketEventPusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_connection(conn("c1"), tx1).await;
        pusher.register_connection(conn("c2"), tx2).await;

        // when (操作):
        let result = pusher.broadcast_all("presence").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("presence".to_string()));
        assert_eq!(rx2.recv().await, Some("presence".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_connection() {
        // テスト項目: 登録解除後の接続には送信できない
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_connection(conn("c1"), tx).await;

        // when (操作):
        pusher.unregister_connection(&conn("c1")).await;
        let result = pusher.push_to(&conn("c1"), "Hello").await;

        // then (期待する結果):
        assert_eq!(pusher.connection_count().await, 0);
        assert!(matches!(
            result,
            Err(EventPushError::ConnectionNotFound(_))
        ));
    }
}
