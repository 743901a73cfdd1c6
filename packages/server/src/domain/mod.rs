//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod presence;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    Block, DirectMessage, Friendship, FriendshipStatus, MessageKind, Room, RoomMessage, User,
};
pub use error::{RepositoryError, RoomError, ValueObjectError};
pub use factory::{ConnectionIdFactory, MessageIdFactory, RoomIdFactory, UserIdFactory};
pub use presence::{OnlineUserIndex, RoomChannelIndex};
pub use pusher::{EventPushError, EventPusher, PusherChannel};
pub use repository::{
    BlockRepository, DirectMessageRepository, FriendshipRepository, RoomMessageRepository,
    RoomRepository, UserRepository,
};
pub use value_object::{
    ConnectionId, Email, MessageContent, MessageId, RoomId, RoomName, Timestamp, UserId,
};
