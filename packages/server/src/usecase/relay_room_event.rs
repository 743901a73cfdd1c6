//! UseCase: ルーム向け情報イベントの中継（`user-left` など）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayRoomEventUseCase::execute() メソッド
//! - ルーム購読者への情報イベントの配信
//!
//! ### なぜこのテストが必要か
//! - 購読者にのみ届き、未購読の接続には届かないことを保証する
//! - 購読者のいないルームへの中継がエラーにならないことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数購読者への配信
//! - エッジケース：空のルームへの中継

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, RoomChannelIndex, RoomId};

/// ルーム向け情報イベント中継のユースケース
///
/// ステートレスな pass-through であり、重複排除は行いません。
pub struct RelayRoomEventUseCase {
    /// ルームチャンネル索引（サーバーライフタイムの共有状態）
    room_channels: Arc<Mutex<RoomChannelIndex>>,
    /// EventPusher（イベント通知の抽象化）
    event_pusher: Arc<dyn EventPusher>,
}

impl RelayRoomEventUseCase {
    /// 新しい RelayRoomEventUseCase を作成
    pub fn new(
        room_channels: Arc<Mutex<RoomChannelIndex>>,
        event_pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            room_channels,
            event_pusher,
        }
    }

    /// イベントの中継を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 配信対象のルーム ID
    /// * `message` - 中継するメッセージ（JSON）
    ///
    /// # Returns
    ///
    /// 配信対象になった接続 ID のリスト（購読者がいなければ空）
    pub async fn execute(
        &self,
        room_id: &RoomId,
        message: &str,
    ) -> Result<Vec<ConnectionId>, String> {
        let targets = {
            let room_channels = self.room_channels.lock().await;
            room_channels.subscribers_of(room_id)
        };

        if targets.is_empty() {
            tracing::debug!("No subscribers for room '{}', dropping relay", room_id);
            return Ok(targets);
        }

        self.event_pusher
            .broadcast(targets.clone(), message)
            .await
            .map_err(|e| e.to_string())?;

        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::event_pusher::WebSocketEventPusher;
    use tokio::sync::mpsc;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    struct TestContext {
        usecase: RelayRoomEventUseCase,
        room_channels: Arc<Mutex<RoomChannelIndex>>,
        pusher: Arc<WebSocketEventPusher>,
    }

    fn create_context() -> TestContext {
        let room_channels = Arc::new(Mutex::new(RoomChannelIndex::new()));
        let pusher = Arc::new(WebSocketEventPusher::new());
        TestContext {
            usecase: RelayRoomEventUseCase::new(room_channels.clone(), pusher.clone()),
            room_channels,
            pusher,
        }
    }

    #[tokio::test]
    async fn test_relay_reaches_subscribers_only() {
        // テスト項目: 購読者には届き、未購読の接続には届かない
        // given (前提条件): c1, c2 が r1 を購読、c3 は未購読
        let ctx = create_context();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        ctx.pusher.register_connection(conn("c1"), tx1).await;
        ctx.pusher.register_connection(conn("c2"), tx2).await;
        ctx.pusher.register_connection(conn("c3"), tx3).await;
        {
            let mut channels = ctx.room_channels.lock().await;
            channels.join(room("r1"), conn("c1"));
            channels.join(room("r1"), conn("c2"));
        }

        // when (操作):
        let targets = ctx.usecase.execute(&room("r1"), "left").await.unwrap();

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        assert_eq!(rx1.recv().await, Some("left".to_string()));
        assert_eq!(rx2.recv().await, Some("left".to_string()));
        assert!(rx3.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_to_empty_room_is_not_an_error() {
        // テスト項目: 購読者のいないルームへの中継はエラーにならない
        // given (前提条件):
        let ctx = create_context();

        // when (操作):
        let result = ctx.usecase.execute(&room("empty"), "left").await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
    }
}
