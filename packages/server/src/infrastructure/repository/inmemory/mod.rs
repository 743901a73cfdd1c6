//! InMemory Repository 実装
//!
//! HashMap / Vec をインメモリ DB として使用します。
//!
//! ## 技術的負債
//!
//! 現在、ドメインモデルを直接ストレージとして使用しています。
//! これは InMemory 実装では許容される妥協ですが、将来ドキュメント DB
//! などの DBMS を実装する際は、以下の変換層が必要になります：
//!
//! ```text
//! DB Document/JSON → Data (DTO) → ドメインモデル
//! ```

pub mod block;
pub mod direct_message;
pub mod friendship;
pub mod room;
pub mod room_message;
pub mod user;

pub use block::InMemoryBlockRepository;
pub use direct_message::InMemoryDirectMessageRepository;
pub use friendship::InMemoryFriendshipRepository;
pub use room::InMemoryRoomRepository;
pub use room_message::InMemoryRoomMessageRepository;
pub use user::InMemoryUserRepository;
