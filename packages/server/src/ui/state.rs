//! Server state and connection management.

use std::sync::Arc;

use crate::domain::{
    BlockRepository, DirectMessageRepository, EventPusher, FriendshipRepository,
    RoomMessageRepository, RoomRepository, UserRepository,
};
use crate::usecase::{
    DisconnectConnectionUseCase, IdentifyUserUseCase, JoinRoomUseCase, RelayDirectMessageUseCase,
    RelayRoomEventUseCase, RelayRoomInviteUseCase,
};

/// Shared application state
///
/// Constructed once at process start and handed to every handler by
/// reference; the presence indices live inside the socket use cases and
/// are never reachable as globals.
pub struct AppState {
    /// EventPusher（接続の登録・イベント送信の抽象化）
    pub event_pusher: Arc<dyn EventPusher>,

    // Socket event use cases
    /// IdentifyUserUseCase（プレゼンス登録のユースケース）
    pub identify_user_usecase: Arc<IdentifyUserUseCase>,
    /// DisconnectConnectionUseCase（接続切断のユースケース）
    pub disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    /// JoinRoomUseCase（チャンネル購読のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// RelayDirectMessageUseCase（DM cue 中継のユースケース）
    pub relay_direct_message_usecase: Arc<RelayDirectMessageUseCase>,
    /// RelayRoomEventUseCase（ルーム向け情報イベント中継のユースケース）
    pub relay_room_event_usecase: Arc<RelayRoomEventUseCase>,
    /// RelayRoomInviteUseCase（招待 cue 中継のユースケース）
    pub relay_room_invite_usecase: Arc<RelayRoomInviteUseCase>,

    // Repositories consumed by the REST layer (thin wrappers)
    /// UserRepository（データアクセス層の抽象化）
    pub user_repository: Arc<dyn UserRepository>,
    /// RoomRepository（データアクセス層の抽象化）
    pub room_repository: Arc<dyn RoomRepository>,
    /// RoomMessageRepository（データアクセス層の抽象化）
    pub room_message_repository: Arc<dyn RoomMessageRepository>,
    /// DirectMessageRepository（データアクセス層の抽象化）
    pub direct_message_repository: Arc<dyn DirectMessageRepository>,
    /// BlockRepository（データアクセス層の抽象化）
    pub block_repository: Arc<dyn BlockRepository>,
    /// FriendshipRepository（データアクセス層の抽象化）
    pub friendship_repository: Arc<dyn FriendshipRepository>,
}
