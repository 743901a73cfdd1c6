//! UseCase: プレゼンス登録処理（`user:connect`）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - IdentifyUserUseCase::execute() メソッド
//! - ユーザー ID と接続の紐付け（上書きを含む）
//!
//! ### なぜこのテストが必要か
//! - last-writer-wins の不変条件を UseCase 境界で保証する
//! - プレゼンス通知が索引の変更後に全接続へ届くことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーのプレゼンス登録
//! - エッジケース：同一ユーザーの再登録（別接続からの上書き）

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, OnlineUserIndex, UserId};

/// プレゼンス登録のユースケース
///
/// ユーザー ID はクライアントが自己申告した値です。セッションとの照合は
/// 行いません（既知の信頼境界、WebSocket ハンドラのドキュメント参照）。
pub struct IdentifyUserUseCase {
    /// オンラインユーザー索引（サーバーライフタイムの共有状態）
    online_users: Arc<Mutex<OnlineUserIndex>>,
    /// EventPusher（イベント通知の抽象化）
    event_pusher: Arc<dyn EventPusher>,
}

impl IdentifyUserUseCase {
    /// 新しい IdentifyUserUseCase を作成
    pub fn new(
        online_users: Arc<Mutex<OnlineUserIndex>>,
        event_pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            online_users,
            event_pusher,
        }
    }

    /// プレゼンス登録を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 登録するユーザーの ID（クライアント申告値）
    /// * `connection_id` - このイベントを送信した接続の ID
    ///
    /// # Returns
    ///
    /// 登録後のオンラインユーザー ID 一覧（ソート済み）
    pub async fn execute(&self, user_id: UserId, connection_id: ConnectionId) -> Vec<UserId> {
        let mut online_users = self.online_users.lock().await;

        if let Some(superseded) = online_users.identify(user_id.clone(), connection_id) {
            tracing::info!(
                "User '{}' re-identified; superseding connection '{}'",
                user_id,
                superseded
            );
        } else {
            tracing::info!("User '{}' is now online", user_id);
        }

        online_users.online_user_ids()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::event_pusher::WebSocketEventPusher;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn create_usecase() -> (IdentifyUserUseCase, Arc<Mutex<OnlineUserIndex>>) {
        let online_users = Arc::new(Mutex::new(OnlineUserIndex::new()));
        let pusher = Arc::new(WebSocketEventPusher::new());
        (
            IdentifyUserUseCase::new(online_users.clone(), pusher),
            online_users,
        )
    }

    #[tokio::test]
    async fn test_identify_new_user() {
        // テスト項目: 新規ユーザーの登録後、オンライン一覧にそのユーザーが含まれる
        // given (前提条件):
        let (usecase, _index) = create_usecase();

        // when (操作):
        let online = usecase.execute(user("u1"), conn("c1")).await;

        // then (期待する結果):
        assert_eq!(online, vec![user("u1")]);
    }

    #[tokio::test]
    async fn test_identify_overwrites_previous_connection() {
        // テスト項目: 同一ユーザーの再登録で接続が上書きされ、一覧は 1 件のまま
        // given (前提条件):
        let (usecase, index) = create_usecase();
        usecase.execute(user("u1"), conn("c1")).await;

        // when (操作):
        let online = usecase.execute(user("u1"), conn("c2")).await;

        // then (期待する結果):
        assert_eq!(online, vec![user("u1")]);
        let index = index.lock().await;
        assert_eq!(index.connection_of(&user("u1")), Some(&conn("c2")));
    }

    #[tokio::test]
    async fn test_broadcast_presence_reaches_all_connections() {
        // テスト項目: broadcast_presence が Pusher の broadcast_all に委譲される
        // given (前提条件):
        let mut mock_pusher = crate::domain::pusher::MockEventPusher::new();
        mock_pusher
            .expect_broadcast_all()
            .withf(|message| message.contains("users:online"))
            .times(1)
            .returning(|_| Ok(()));
        let usecase = IdentifyUserUseCase::new(
            Arc::new(Mutex::new(OnlineUserIndex::new())),
            Arc::new(mock_pusher),
        );

        // when (操作):
        let result = usecase
            .broadcast_presence(r#"{"event":"users:online","data":["u1"]}"#)
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_identify_multiple_users_sorted() {
        // テスト項目: 複数ユーザーの登録後、一覧がソート済みで返される
        // given (前提条件):
        let (usecase, _index) = create_usecase();
        usecase.execute(user("u2"), conn("c2")).await;

        // when (操作):
        let online = usecase.execute(user("u1"), conn("c1")).await;

        // then (期待する結果):
        assert_eq!(online, vec![user("u1"), user("u2")]);
    }
}
