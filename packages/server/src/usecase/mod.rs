//! UseCase 層
//!
//! ソケットイベントごとのアプリケーションロジックを提供します。
//! 各 UseCase はドメイン層の trait（Repository, EventPusher）と
//! プレゼンス索引にのみ依存します。

pub mod disconnect_connection;
pub mod identify_user;
pub mod join_room;
pub mod relay_direct_message;
pub mod relay_room_event;
pub mod relay_room_invite;

pub use disconnect_connection::DisconnectConnectionUseCase;
pub use identify_user::IdentifyUserUseCase;
pub use join_room::JoinRoomUseCase;
pub use relay_direct_message::RelayDirectMessageUseCase;
pub use relay_room_event::RelayRoomEventUseCase;
pub use relay_room_invite::RelayRoomInviteUseCase;
