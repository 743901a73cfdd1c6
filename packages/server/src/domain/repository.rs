//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ソケット層はこれらのインターフェースを「永続化された真実の源」として
//! 参照するだけで、メッセージ本文を保持しません。

use async_trait::async_trait;

use super::{
    entity::{Block, DirectMessage, Friendship, Room, RoomMessage, User},
    error::RepositoryError,
    value_object::{Email, RoomId, RoomName, UserId},
};

/// User Repository trait
///
/// ユーザーの登録・検索のインターフェース。認証情報（パスワード等）は
/// 外部の認証レイヤーが管理するため、ここでは扱いません。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを登録する
    async fn add_user(&self, user: User) -> Result<(), RepositoryError>;

    /// ID でユーザーを取得する
    async fn find_by_id(&self, user_id: &UserId) -> Result<User, RepositoryError>;

    /// メールアドレスでユーザーを取得する
    async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError>;

    /// 指定ユーザー以外の全ユーザーを取得する
    async fn list_users_excluding(&self, user_id: &UserId) -> Vec<User>;
}

/// Room Repository trait
///
/// ドメイン層が必要とするデータストアへのインターフェース。
/// UseCase 層・UI 層はこの trait に依存し、Infrastructure 層の
/// 具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を追加する
    async fn add_room(&self, room: Room) -> Result<(), RepositoryError>;

    /// Room エンティティを取得する
    async fn find_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// 指定ユーザーが参加している Room の一覧を取得する
    async fn rooms_for_user(&self, user_id: &UserId) -> Vec<Room>;

    /// Room の名前を変更する
    async fn rename_room(&self, room_id: &RoomId, name: RoomName) -> Result<(), RepositoryError>;

    /// Room を削除する
    async fn delete_room(&self, room_id: &RoomId) -> Result<(), RepositoryError>;

    /// 参加者を追加する
    async fn add_participant(
        &self,
        room_id: &RoomId,
        user_id: UserId,
    ) -> Result<(), RepositoryError>;

    /// 参加者を削除する
    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), RepositoryError>;
}

/// Room Message Repository trait
#[async_trait]
pub trait RoomMessageRepository: Send + Sync {
    /// メッセージを追加する
    async fn add_message(&self, message: RoomMessage) -> Result<(), RepositoryError>;

    /// Room のメッセージ履歴を作成時刻順で取得する
    async fn messages_for_room(&self, room_id: &RoomId) -> Vec<RoomMessage>;
}

/// Direct Message Repository trait
#[async_trait]
pub trait DirectMessageRepository: Send + Sync {
    /// ダイレクトメッセージを追加する
    async fn add_message(&self, message: DirectMessage) -> Result<(), RepositoryError>;

    /// 2 ユーザー間の会話（双方向）を作成時刻順で取得する
    async fn conversation(&self, user_a: &UserId, user_b: &UserId) -> Vec<DirectMessage>;

    /// sender から receiver への未読メッセージを既読にする
    ///
    /// 既読にしたメッセージ数を返す
    async fn mark_conversation_read(&self, receiver: &UserId, sender: &UserId) -> usize;

    /// receiver 宛の未読メッセージ数を送信者ごとに集計する
    async fn unread_counts(&self, receiver: &UserId) -> Vec<(UserId, usize)>;
}

/// Block Repository trait
#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// ブロックを追加する（同一ペアの重複は許可しない）
    async fn add_block(&self, block: Block) -> Result<(), RepositoryError>;

    /// ブロックを解除する
    async fn remove_block(
        &self,
        user_id: &UserId,
        blocked_user_id: &UserId,
    ) -> Result<(), RepositoryError>;

    /// 指定ユーザーが作成したブロックの一覧を取得する
    async fn blocks_for_user(&self, user_id: &UserId) -> Vec<Block>;
}

/// Friendship Repository trait
///
/// ダイレクトチャットのリンクを管理する。リンクは双方向に保存されます。
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// 双方向の friendship を追加する（既に存在する場合は no-op）
    ///
    /// 新規作成した場合は `true` を返す
    async fn add_pair(&self, pair: [Friendship; 2]) -> Result<bool, RepositoryError>;

    /// 2 ユーザー間に friendship が存在するかを確認する
    async fn exists_between(&self, user_a: &UserId, user_b: &UserId) -> bool;

    /// 指定ユーザーの friendship 一覧を取得する
    async fn friendships_of(&self, user_id: &UserId) -> Vec<Friendship>;
}
