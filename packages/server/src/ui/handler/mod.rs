//! HTTP / WebSocket endpoint handlers.

pub mod http;
pub mod websocket;

pub use http::{
    create_block, create_direct_chat, create_room, delete_block, delete_room, find_user,
    get_blocks, get_direct_chats, get_direct_conversation, get_room_detail, get_room_messages,
    get_rooms, get_unread_counts, health_check, invite_user, leave_room, list_users,
    mark_direct_messages_read, post_direct_message, post_room_message, register,
    remove_participant, update_room,
};
pub use websocket::websocket_handler;
