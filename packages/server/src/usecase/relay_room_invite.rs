//! UseCase: 招待 cue の中継（`inviteUser`）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayRoomInviteUseCase::execute() メソッド
//! - メールアドレスから招待先ユーザーを解決し、その接続へ cue を届ける
//!
//! ### なぜこのテストが必要か
//! - 招待はルームチャンネルではなく「特定ユーザーの接続」への配信である
//! - 未登録のメールアドレス・オフラインのユーザーが silent drop に
//!   なること（エラーにしない）を保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：オンラインの招待先への配信
//! - エッジケース：オフラインの招待先、未知のメールアドレス

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Email, EventPusher, OnlineUserIndex, UserRepository};

/// 招待 cue 中継のユースケース
pub struct RelayRoomInviteUseCase {
    /// UserRepository（データアクセス層の抽象化）
    user_repository: Arc<dyn UserRepository>,
    /// オンラインユーザー索引（サーバーライフタイムの共有状態）
    online_users: Arc<Mutex<OnlineUserIndex>>,
    /// EventPusher（イベント通知の抽象化）
    event_pusher: Arc<dyn EventPusher>,
}

impl RelayRoomInviteUseCase {
    /// 新しい RelayRoomInviteUseCase を作成
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        online_users: Arc<Mutex<OnlineUserIndex>>,
        event_pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            user_repository,
            online_users,
            event_pusher,
        }
    }

    /// cue の中継を実行
    ///
    /// 招待先が見つからない・オフラインの場合は silent drop です。
    ///
    /// # Arguments
    ///
    /// * `email` - 招待先ユーザーのメールアドレス
    /// * `message` - 中継するメッセージ（JSON）
    ///
    /// # Returns
    ///
    /// 配信した接続の ID（配信しなかった場合は `None`）
    pub async fn execute(
        &self,
        email: &Email,
        message: &str,
    ) -> Result<Option<ConnectionId>, String> {
        let invited = match self.user_repository.find_by_email(email).await {
            Ok(user) => user,
            Err(_) => {
                tracing::debug!("No registered user for invite email '{}'", email);
                return Ok(None);
            }
        };

        let target = {
            let online_users = self.online_users.lock().await;
            online_users.connection_of(&invited.id).cloned()
        };

        let Some(connection_id) = target else {
            tracing::debug!("Invited user '{}' is offline, dropping cue", invited.id);
            return Ok(None);
        };

        self.event_pusher
            .push_to(&connection_id, message)
            .await
            .map_err(|e| e.to_string())?;

        Ok(Some(connection_id))
    }
}
