//! InMemory Room Repository 実装

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    RepositoryError, Room, RoomError, RoomId, RoomName, RoomRepository, UserId,
};

/// インメモリ Room Repository 実装
///
/// Room ドメインモデルを保持し、ドメイン層の RoomRepository trait を
/// 実装します（依存性の逆転）。
pub struct InMemoryRoomRepository {
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn add_room(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn find_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn rooms_for_user(&self, user_id: &UserId) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut result: Vec<Room> = rooms
            .values()
            .filter(|r| r.is_participant(user_id))
            .cloned()
            .collect();
        // Sort by creation time for consistent ordering
        result.sort_by_key(|r| r.created_at);
        result
    }

    async fn rename_room(&self, room_id: &RoomId, name: RoomName) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;
        room.name = name;
        Ok(())
    }

    async fn delete_room(&self, room_id: &RoomId) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .remove(room_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn add_participant(
        &self,
        room_id: &RoomId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;
        room.add_participant(user_id).map_err(|e| match e {
            RoomError::AlreadyParticipant(id) => RepositoryError::AlreadyParticipant(id),
        })
    }

    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;
        room.remove_participant(user_id);
        Ok(())
    }
}
