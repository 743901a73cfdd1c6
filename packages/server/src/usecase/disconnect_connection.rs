//! UseCase: 接続切断処理（トランスポートレベルの disconnect）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectConnectionUseCase::execute() メソッド
//! - 切断時のプレゼンス索引・チャンネル購読・Pusher 登録の後始末
//!
//! ### なぜこのテストが必要か
//! - last-writer-wins：上書きされた古い接続の切断がユーザーを
//!   オフラインにしないことを保証する
//! - プレゼンス通知は索引が実際に変化した場合のみ発火することを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：現在の接続の切断（通知あり）
//! - エッジケース：上書き済みの接続の切断（通知なし）
//! - 異常系：未知の接続の切断（no-op）

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, OnlineUserIndex, RoomChannelIndex, UserId};

/// 接続切断のユースケース
pub struct DisconnectConnectionUseCase {
    /// オンラインユーザー索引（サーバーライフタイムの共有状態）
    online_users: Arc<Mutex<OnlineUserIndex>>,
    /// ルームチャンネル索引（サーバーライフタイムの共有状態）
    room_channels: Arc<Mutex<RoomChannelIndex>>,
    /// EventPusher（イベント通知の抽象化）
    event_pusher: Arc<dyn EventPusher>,
}

impl DisconnectConnectionUseCase {
    /// 新しい DisconnectConnectionUseCase を作成
    pub fn new(
        online_users: Arc<Mutex<OnlineUserIndex>>,
        room_channels: Arc<Mutex<RoomChannelIndex>>,
        event_pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            online_users,
            room_channels,
            event_pusher,
        }
    }

    /// 接続切断を実行
    ///
    /// 全ての操作は total です。未知の接続・既に削除済みの接続の切断は
    /// no-op として処理されます。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 切断された接続の ID
    ///
    /// # Returns
    ///
    /// * `Some(online_user_ids)` - プレゼンス索引からエントリが削除された
    ///   場合。プレゼンス通知を発火すべきことを示す
    /// * `None` - 索引が変化しなかった場合（上書き済み・未識別の接続）。
    ///   より新しい接続が有効なままであり、通知は不要
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Vec<UserId>> {
        // 1. チャンネル購読を削除（暗黙的な leave）
        {
            let mut room_channels = self.room_channels.lock().await;
            room_channels.drop_connection(connection_id);
        }

        // 2. EventPusher から接続を登録解除
        self.event_pusher
            .unregister_connection(connection_id)
            .await;

        // 3. プレゼンス索引から削除（この接続が現在の接続である場合のみ）
        let mut online_users = self.online_users.lock().await;
        match online_users.remove_connection(connection_id) {
            Some(user_id) => {
                tracing::info!(
                    "User '{}' went offline (connection '{}')",
                    user_id,
                    connection_id
                );
                Some(online_users.online_user_ids())
            }
            None => {
                tracing::debug!(
                    "Connection '{}' disconnected without presence change",
                    connection_id
                );
                None
            }
        }
    }

    /// プレゼンス通知を全接続にブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_presence(&self, message: &str) -> Result<(), String> {
        self.event_pusher
            .broadcast_all(message)
            .await
            .map_err(|e| e.to_string())
    }
}
