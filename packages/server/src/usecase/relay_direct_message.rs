//! UseCase: ダイレクトメッセージの cue 中継（`send-direct-message`）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayDirectMessageUseCase::execute() メソッド
//! - 送信者・受信者それぞれの現在の接続への配信
//!
//! ### なぜこのテストが必要か
//! - 双方がオンラインなら両方に、オフラインなら誰にも届かず、
//!   どちらの場合もエラーにならないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：双方オンライン
//! - エッジケース：片方のみオンライン、双方オフライン
//!
//! ## 設計ノート
//!
//! この中継はステートレスな cue であり、メッセージ本文の永続化とは
//! 独立しています。永続化の REST 書き込みはクライアントが別途行うため、
//! cue が読み取り可能なデータより先に届くことがあります
//! （refetch は REST 層で整合します）。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, OnlineUserIndex, UserId};

/// ダイレクトメッセージ cue 中継のユースケース
pub struct RelayDirectMessageUseCase {
    /// オンラインユーザー索引（サーバーライフタイムの共有状態）
    online_users: Arc<Mutex<OnlineUserIndex>>,
    /// EventPusher（イベント通知の抽象化）
    event_pusher: Arc<dyn EventPusher>,
}

impl RelayDirectMessageUseCase {
    /// 新しい RelayDirectMessageUseCase を作成
    pub fn new(
        online_users: Arc<Mutex<OnlineUserIndex>>,
        event_pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            online_users,
            event_pusher,
        }
    }

    /// cue の中継を実行
    ///
    /// オフラインの宛先は静かにスキップされます（エラーにしない）。
    ///
    /// # Arguments
    ///
    /// * `sender_id` - 送信者のユーザー ID（クライアント申告値）
    /// * `receiver_id` - 受信者のユーザー ID
    /// * `message` - 中継するメッセージ（JSON）
    ///
    /// # Returns
    ///
    /// 配信対象になった接続 ID のリスト
    pub async fn execute(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
        message: &str,
    ) -> Result<Vec<ConnectionId>, String> {
        let targets = self.resolve_targets(sender_id, receiver_id).await;

        if targets.is_empty() {
            tracing::debug!(
                "No online connections for direct message between '{}' and '{}'",
                sender_id,
                receiver_id
            );
            return Ok(targets);
        }

        self.event_pusher
            .broadcast(targets.clone(), message)
            .await
            .map_err(|e| e.to_string())?;

        Ok(targets)
    }

    /// 送信者・受信者の現在の接続を解決
    ///
    /// 同一接続が両者を兼ねる場合は重複を除きます。
    async fn resolve_targets(&self, sender_id: &UserId, receiver_id: &UserId) -> Vec<ConnectionId> {
        let online_users = self.online_users.lock().await;
        let mut targets = Vec::new();
        for user_id in [sender_id, receiver_id] {
            if let Some(connection_id) = online_users.connection_of(user_id)
                && !targets.contains(connection_id)
            {
                targets.push(connection_id.clone());
            }
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::event_pusher::WebSocketEventPusher;
    use tokio::sync::mpsc;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    struct TestContext {
        usecase: RelayDirectMessageUseCase,
        online_users: Arc<Mutex<OnlineUserIndex>>,
        pusher: Arc<WebSocketEventPusher>,
    }

    fn create_context() -> TestContext {
        let online_users = Arc::new(Mutex::new(OnlineUserIndex::new()));
        let pusher = Arc::new(WebSocketEventPusher::new());
        TestContext {
            usecase: RelayDirectMessageUseCase::new(online_users.clone(), pusher.clone()),
            online_users,
            pusher,
        }
    }

    #[tokio::test]
    async fn test_relay_delivers_to_both_online_parties() {
        // テスト項目: 双方がオンラインなら両方の接続に届く
        // given (前提条件):
        let ctx = create_context();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        ctx.pusher.register_connection(conn("ca"), tx_a).await;
        ctx.pusher.register_connection(conn("cb"), tx_b).await;
        {
            let mut index = ctx.online_users.lock().await;
            index.identify(user("a"), conn("ca"));
            index.identify(user("b"), conn("cb"));
        }

        // when (操作):
        let targets = ctx
            .usecase
            .execute(&user("a"), &user("b"), "dm cue")
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        assert_eq!(rx_a.recv().await, Some("dm cue".to_string()));
        assert_eq!(rx_b.recv().await, Some("dm cue".to_string()));
    }

    #[tokio::test]
    async fn test_relay_delivers_to_online_party_only() {
        // テスト項目: 片方のみオンラインの場合、その接続だけに届く
        // given (前提条件): a のみオンライン
        let ctx = create_context();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        ctx.pusher.register_connection(conn("ca"), tx_a).await;
        ctx.online_users
            .lock()
            .await
            .identify(user("a"), conn("ca"));

        // when (操作):
        let targets = ctx
            .usecase
            .execute(&user("a"), &user("b"), "dm cue")
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(targets, vec![conn("ca")]);
        assert_eq!(rx_a.recv().await, Some("dm cue".to_string()));
    }

    #[tokio::test]
    async fn test_relay_with_both_offline_is_not_an_error() {
        // テスト項目: 双方オフラインでもエラーにならず、配信対象は空
        // given (前提条件):
        let ctx = create_context();

        // when (操作):
        let result = ctx.usecase.execute(&user("a"), &user("b"), "dm cue").await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
    }
}
