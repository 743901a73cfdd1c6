//! In-process integration tests for the real-time presence and fanout
//! layer.
//!
//! The full use-case graph is wired exactly as in the server binary, with
//! `tokio::sync::mpsc` channels standing in for WebSocket connections so
//! delivery can be asserted deterministically.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use idobata_server::domain::{
    ConnectionId, DirectMessage, DirectMessageRepository, EventPusher, MessageContent,
    MessageIdFactory, OnlineUserIndex, RoomChannelIndex, RoomId, Timestamp, UserId,
};
use idobata_server::infrastructure::dto::websocket::{
    DirectMessagePayload, NewMessagePayload, ServerEvent,
};
use idobata_server::infrastructure::event_pusher::WebSocketEventPusher;
use idobata_server::infrastructure::repository::InMemoryDirectMessageRepository;
use idobata_server::usecase::{
    DisconnectConnectionUseCase, IdentifyUserUseCase, JoinRoomUseCase,
    RelayDirectMessageUseCase, RelayRoomEventUseCase,
};

/// Everything a connection-level test needs, wired like the server binary
struct Harness {
    pusher: Arc<WebSocketEventPusher>,
    identify: IdentifyUserUseCase,
    disconnect: DisconnectConnectionUseCase,
    join_room: JoinRoomUseCase,
    relay_dm: RelayDirectMessageUseCase,
    relay_room: RelayRoomEventUseCase,
}

impl Harness {
    fn new() -> Self {
        let online_users = Arc::new(Mutex::new(OnlineUserIndex::new()));
        let room_channels = Arc::new(Mutex::new(RoomChannelIndex::new()));
        let pusher = Arc::new(WebSocketEventPusher::new());
        Self {
            identify: IdentifyUserUseCase::new(online_users.clone(), pusher.clone()),
            disconnect: DisconnectConnectionUseCase::new(
                online_users.clone(),
                room_channels.clone(),
                pusher.clone(),
            ),
            join_room: JoinRoomUseCase::new(room_channels.clone(), pusher.clone()),
            relay_dm: RelayDirectMessageUseCase::new(online_users, pusher.clone()),
            relay_room: RelayRoomEventUseCase::new(room_channels, pusher.clone()),
            pusher,
        }
    }

    /// Register a fake transport connection, returning its receive side
    async fn connect(&self, id: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_connection(conn(id), tx).await;
        rx
    }

    /// Emit `user:connect` the way the event router does: mutate the index,
    /// then broadcast the full online set to every connection
    async fn user_connect(&self, user_id: &str, connection_id: &str) {
        let online = self.identify.execute(user(user_id), conn(connection_id)).await;
        let frame = users_online_frame(online);
        self.identify.broadcast_presence(&frame).await.unwrap();
    }

    /// Transport disconnect: cleanup, presence broadcast only on change
    async fn transport_disconnect(&self, connection_id: &str) {
        if let Some(online) = self.disconnect.execute(&conn(connection_id)).await {
            let frame = users_online_frame(online);
            self.disconnect.broadcast_presence(&frame).await.unwrap();
        }
    }
}

fn user(id: &str) -> UserId {
    UserId::new(id.to_string()).unwrap()
}

fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

fn users_online_frame(online: Vec<UserId>) -> String {
    let ids = online.into_iter().map(|id| id.into_string()).collect();
    serde_json::to_string(&ServerEvent::UsersOnline(ids)).unwrap()
}

/// Decode an outbound frame back into a ServerEvent
fn decode(frame: &str) -> ServerEvent {
    serde_json::from_str(frame).unwrap()
}

fn online_set(event: ServerEvent) -> Vec<String> {
    match event {
        ServerEvent::UsersOnline(ids) => ids,
        other => panic!("expected users:online, got {:?}", other),
    }
}

#[tokio::test]
async fn test_presence_flow_connect_then_disconnect() {
    // テスト項目: user:connect で全接続に users:online が届き、
    //             切断後は u1 を含まない集合が再配信される
    // given (前提条件): c1, c2 が接続済み
    let harness = Harness::new();
    let mut rx1 = harness.connect("c1").await;
    let mut rx2 = harness.connect("c2").await;

    // when (操作): c1 が "u1" として identify
    harness.user_connect("u1", "c1").await;

    // then (期待する結果): 両方の接続に "u1" を含む users:online が届く
    assert_eq!(online_set(decode(&rx1.recv().await.unwrap())), vec!["u1"]);
    assert_eq!(online_set(decode(&rx2.recv().await.unwrap())), vec!["u1"]);

    // when (操作): c1 が切断される
    harness.transport_disconnect("c1").await;

    // then (期待する結果): 残った接続に "u1" を含まない users:online が届く
    let remaining = online_set(decode(&rx2.recv().await.unwrap()));
    assert!(remaining.is_empty());
    // c1 は登録解除済みなので受信しない
    assert!(rx1.try_recv().is_err());
}

#[tokio::test]
async fn test_presence_last_writer_wins_across_connections() {
    // テスト項目: 上書きされた古い接続の切断ではプレゼンス再配信が発生しない
    // given (前提条件): u1 が c1 で identify した後、c2 で再 identify
    let harness = Harness::new();
    let _rx1 = harness.connect("c1").await;
    let mut rx2 = harness.connect("c2").await;
    harness.user_connect("u1", "c1").await;
    harness.user_connect("u1", "c2").await;
    // 既知の通知を読み捨てる
    while rx2.try_recv().is_ok() {}

    // when (操作): 古い接続 c1 が切断される
    harness.transport_disconnect("c1").await;

    // then (期待する結果): 索引は変化せず、通知も発生しない
    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn test_room_fanout_reaches_subscribers_exactly_once() {
    // テスト項目: c1, c2 が r1 に join、c1 起点の cue で c2 に new-message が
    //             ちょうど 1 回届き、未参加の c3 には届かない
    // given (前提条件):
    let harness = Harness::new();
    let mut rx1 = harness.connect("c1").await;
    let mut rx2 = harness.connect("c2").await;
    let mut rx3 = harness.connect("c3").await;
    harness.join_room.execute(conn("c1"), room("r1")).await;
    harness.join_room.execute(conn("c2"), room("r1")).await;

    // when (操作): r1 に cue をブロードキャスト
    let cue = serde_json::to_string(&ServerEvent::NewMessage(NewMessagePayload {
        sender: "system".to_string(),
        text: "A new user joined the room".to_string(),
        room_id: "r1".to_string(),
    }))
    .unwrap();
    harness
        .join_room
        .broadcast_to_room(&room("r1"), &cue)
        .await
        .unwrap();

    // then (期待する結果):
    assert!(matches!(
        decode(&rx2.recv().await.unwrap()),
        ServerEvent::NewMessage(_)
    ));
    assert!(rx2.try_recv().is_err());
    assert!(matches!(
        decode(&rx1.recv().await.unwrap()),
        ServerEvent::NewMessage(_)
    ));
    assert!(rx3.try_recv().is_err());
}

#[tokio::test]
async fn test_relay_before_join_is_not_delivered() {
    // テスト項目: join 前の接続にはルームの cue が届かない
    // given (前提条件): c1 は接続済みだが r1 に join していない
    let harness = Harness::new();
    let mut rx1 = harness.connect("c1").await;

    // when (操作):
    harness
        .relay_room
        .execute(&room("r1"), "cue")
        .await
        .unwrap();

    // then (期待する結果):
    assert!(rx1.try_recv().is_err());
}

#[tokio::test]
async fn test_direct_message_cue_then_refetch() {
    // テスト項目: DM の cue が双方の接続に届き、本文は永続化層への
    //             refetch で取得される（cue はデータを運ばない）
    // given (前提条件): a, b がオンライン、DM 本文は repository に書き込み済み
    let harness = Harness::new();
    let mut rx_a = harness.connect("ca").await;
    let mut rx_b = harness.connect("cb").await;
    harness.user_connect("a", "ca").await;
    harness.user_connect("b", "cb").await;
    while rx_a.try_recv().is_ok() {}
    while rx_b.try_recv().is_ok() {}

    let dm_repo = InMemoryDirectMessageRepository::new();
    dm_repo
        .add_message(DirectMessage::new(
            MessageIdFactory::generate().unwrap(),
            user("a"),
            user("b"),
            MessageContent::new("hello".to_string()).unwrap(),
            Timestamp::new(1000),
        ))
        .await
        .unwrap();

    // when (操作): cue を中継
    let cue = serde_json::to_string(&ServerEvent::NewDirectMessage(DirectMessagePayload {
        sender_id: "a".to_string(),
        receiver_id: "b".to_string(),
        content: "hello".to_string(),
    }))
    .unwrap();
    let targets = harness
        .relay_dm
        .execute(&user("a"), &user("b"), &cue)
        .await
        .unwrap();

    // then (期待する結果): 双方に届き、refetch で本文が読める
    assert_eq!(targets.len(), 2);
    assert!(matches!(
        decode(&rx_a.recv().await.unwrap()),
        ServerEvent::NewDirectMessage(_)
    ));
    assert!(matches!(
        decode(&rx_b.recv().await.unwrap()),
        ServerEvent::NewDirectMessage(_)
    ));
    let conversation = dm_repo.conversation(&user("a"), &user("b")).await;
    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation[0].content.as_str(), "hello");
}

#[tokio::test]
async fn test_direct_message_cue_with_both_offline() {
    // テスト項目: 双方オフラインの DM cue は誰にも届かず、エラーにもならない
    // given (前提条件): 接続はあるが誰も identify していない
    let harness = Harness::new();
    let mut rx = harness.connect("c1").await;

    // when (操作):
    let targets = harness
        .relay_dm
        .execute(&user("a"), &user("b"), "cue")
        .await
        .unwrap();

    // then (期待する結果):
    assert!(targets.is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_disconnect_drops_room_subscription() {
    // テスト項目: 切断された接続は以後のルーム cue を受け取らない
    // given (前提条件): c1, c2 が r1 に join
    let harness = Harness::new();
    let _rx1 = harness.connect("c1").await;
    let mut rx2 = harness.connect("c2").await;
    harness.join_room.execute(conn("c1"), room("r1")).await;
    harness.join_room.execute(conn("c2"), room("r1")).await;

    // when (操作): c1 切断後に cue をブロードキャスト
    harness.transport_disconnect("c1").await;
    let targets = harness
        .relay_room
        .execute(&room("r1"), "cue")
        .await
        .unwrap();

    // then (期待する結果): 配信対象は c2 のみ
    assert_eq!(targets, vec![conn("c2")]);
    assert_eq!(rx2.recv().await.unwrap(), "cue");
}
