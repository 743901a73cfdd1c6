//! UseCase: ルームチャンネル購読処理（`join-room`）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() / broadcast_to_room() メソッド
//! - チャンネル購読と join 通知のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 購読の冪等性（二重 join で重複配信が起きないこと）を保証する
//! - join 通知が購読者全員（join した本人を含む）に届くことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規購読と join 通知
//! - エッジケース：同一接続の二重 join
//!
//! ## 設計ノート
//!
//! ここでは参加資格のチェックを行いません。任意の接続が任意のルーム ID
//! を購読できます。ルームデータの読み書きの認可は REST 層が排他的に
//! 担うため、未資格の接続に cue が届いても REST 側で拒否されます。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, RoomChannelIndex, RoomId};

/// ルームチャンネル購読のユースケース
pub struct JoinRoomUseCase {
    /// ルームチャンネル索引（サーバーライフタイムの共有状態）
    room_channels: Arc<Mutex<RoomChannelIndex>>,
    /// EventPusher（イベント通知の抽象化）
    event_pusher: Arc<dyn EventPusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        room_channels: Arc<Mutex<RoomChannelIndex>>,
        event_pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            room_channels,
            event_pusher,
        }
    }

    /// チャンネル購読を実行（冪等）
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 購読する接続の ID
    /// * `room_id` - 購読するルームの ID
    ///
    /// # Returns
    ///
    /// 新規購読の場合は `true`、既に購読済みの場合は `false`
    pub async fn execute(&self, connection_id: ConnectionId, room_id: RoomId) -> bool {
        let mut room_channels = self.room_channels.lock().await;
        let newly_joined = room_channels.join(room_id.clone(), connection_id.clone());
        if newly_joined {
            tracing::info!("Connection '{}' joined room '{}'", connection_id, room_id);
        } else {
            tracing::debug!(
                "Connection '{}' re-joined room '{}' (already subscribed)",
                connection_id,
                room_id
            );
        }
        newly_joined
    }

    /// ルームの購読者全員にイベントをブロードキャスト
    ///
    /// join した本人も購読済みであれば配信対象に含まれます。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 配信対象のルーム ID
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_to_room(&self, room_id: &RoomId, message: &str) -> Result<(), String> {
        let targets = {
            let room_channels = self.room_channels.lock().await;
            room_channels.subscribers_of(room_id)
        };
        self.event_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
