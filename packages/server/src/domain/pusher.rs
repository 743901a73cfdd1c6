//! EventPusher trait 定義
//!
//! ドメイン層が必要とするイベント送信（通知）のインターフェースを
//! 定義します。具体的な実装（WebSocket 等）は Infrastructure 層が
//! 提供します（依存性の逆転）。
//!
//! 送信は接続単位（`ConnectionId`）で行います。ユーザーへの配信は、
//! UseCase 層がプレゼンス索引で ConnectionId を解決してから行います。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// クライアントへのイベント送信用チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// イベント送信時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventPushError {
    /// 接続が見つからない
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    /// 送信に失敗した
    #[error("Failed to push event: {0}")]
    PushFailed(String),
}

/// Event Pusher trait
///
/// 配信は常にベストエフォートです。切断済み・未購読の宛先への送信は
/// 静かにスキップされ、キューイングや再送は行いません（at-most-once）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// 接続を登録する
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除する
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信する
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), EventPushError>;

    /// 指定した接続の集合にイベントを送信する（部分的な失敗を許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), EventPushError>;

    /// 登録済みの全ての接続にイベントを送信する
    ///
    /// プレゼンス通知（`users:online`）は識別済みかどうかに関わらず
    /// 全てのトランスポートに届く必要があるため、宛先リストではなく
    /// 登録済み接続全体を対象とします。
    async fn broadcast_all(&self, content: &str) -> Result<(), EventPushError>;
}
