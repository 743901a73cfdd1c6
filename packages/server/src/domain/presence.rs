//! In-memory presence state: who is online, and which connections
//! subscribed to which room channels.
//!
//! 接続状態はプロセスローカルであり、永続化されません。
//! プロセス再起動時には空の状態から再構築されます。
//!
//! Both indices are plain synchronous structs. They are owned by
//! server-lifetime use case objects behind `Arc<Mutex<_>>` and are never
//! reachable as ambient globals; every mutation happens while the owning
//! lock is held, so each index observes a strictly serialized sequence of
//! operations.

use std::collections::{HashMap, HashSet};

use super::value_object::{ConnectionId, RoomId, UserId};

/// Maps a user id to its current connection.
///
/// At most one entry per user: a second `identify` for the same user
/// silently supersedes the previous mapping (last connect wins), even
/// though the superseded connection is not closed. A disconnect only
/// removes the entry if the disconnecting connection is still the mapped
/// one, so a user with two open clients stays online as long as the most
/// recently identifying connection is alive.
#[derive(Debug, Default)]
pub struct OnlineUserIndex {
    entries: HashMap<UserId, ConnectionId>,
}

impl OnlineUserIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Bind a user id to a connection, overwriting any previous binding.
    ///
    /// Returns the superseded connection id, if any.
    pub fn identify(&mut self, user_id: UserId, connection_id: ConnectionId) -> Option<ConnectionId> {
        self.entries.insert(user_id, connection_id)
    }

    /// Remove the entry bound to the given connection, if that connection
    /// is still current for its user.
    ///
    /// Returns the user id that went offline, or `None` when the
    /// connection was unknown or had already been superseded — in the
    /// latter case the newer connection remains authoritative and the user
    /// stays online.
    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> Option<UserId> {
        let user_id = self
            .entries
            .iter()
            .find(|(_, mapped)| *mapped == connection_id)
            .map(|(user_id, _)| user_id.clone())?;
        self.entries.remove(&user_id);
        Some(user_id)
    }

    /// Current connection of a user, if online
    pub fn connection_of(&self, user_id: &UserId) -> Option<&ConnectionId> {
        self.entries.get(user_id)
    }

    /// The full set of online user ids, sorted for consistent ordering
    pub fn online_user_ids(&self) -> Vec<UserId> {
        let mut user_ids: Vec<UserId> = self.entries.keys().cloned().collect();
        user_ids.sort();
        user_ids
    }

    /// Number of online users
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no user is online
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps a room id to the set of connections subscribed to its channel.
///
/// チャンネル購読に認可チェックはありません（仕様上の境界）。
/// データの読み書きの認可は REST 層が排他的に担います。
///
/// Joining is idempotent. There is no explicit leave: subscriptions are
/// dropped only when the connection disconnects. A stale subscription is
/// harmless because relayed events are refetch cues, not data.
#[derive(Debug, Default)]
pub struct RoomChannelIndex {
    channels: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl RoomChannelIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }

    /// Subscribe a connection to a room channel.
    ///
    /// Returns `true` if the connection was newly added, `false` if it was
    /// already subscribed.
    pub fn join(&mut self, room_id: RoomId, connection_id: ConnectionId) -> bool {
        self.channels
            .entry(room_id)
            .or_default()
            .insert(connection_id)
    }

    /// Current subscribers of a room channel, sorted for consistent
    /// ordering. Returns an empty vector for an unknown room.
    pub fn subscribers_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let mut subscribers: Vec<ConnectionId> = self
            .channels
            .get(room_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        subscribers.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        subscribers
    }

    /// Drop a connection from every channel it subscribed to. Channels
    /// left empty are removed. Unknown connections are a no-op.
    pub fn drop_connection(&mut self, connection_id: &ConnectionId) {
        for subscribers in self.channels.values_mut() {
            subscribers.remove(connection_id);
        }
        self.channels.retain(|_, subscribers| !subscribers.is_empty());
    }

    /// Number of channels with at least one subscriber
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
