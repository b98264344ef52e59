use tether_core::{ConnectionId, ServerEvent};

use crate::integration::{create_test_registry, init_tracing};
use crate::utils::{SentEvent, create_room, disconnect, join_room, pair, send_signal, settle};

#[tokio::test]
async fn test_host_disconnect_notifies_client_and_closes_room() {
    init_tracing();

    let (cmd_tx, mut event_rx, _signaling) = create_test_registry();
    let host = ConnectionId::new();
    let client = ConnectionId::new();
    let newcomer = ConnectionId::new();
    pair(&cmd_tx, &mut event_rx, host, client, "desk").await;

    disconnect(&cmd_tx, host).await;
    join_room(&cmd_tx, newcomer, "desk").await;

    let events = settle(&cmd_tx, &mut event_rx).await;
    assert_eq!(
        events,
        vec![
            SentEvent {
                conn_id: client,
                event: ServerEvent::PeerDisconnected,
            },
            SentEvent {
                conn_id: newcomer,
                event: ServerEvent::RoomNotFound("Room not found".to_string()),
            },
        ]
    );
}

#[tokio::test]
async fn test_client_disconnect_removes_whole_room() {
    init_tracing();

    let (cmd_tx, mut event_rx, _signaling) = create_test_registry();
    let host = ConnectionId::new();
    let client = ConnectionId::new();
    let newcomer = ConnectionId::new();
    pair(&cmd_tx, &mut event_rx, host, client, "desk").await;

    disconnect(&cmd_tx, client).await;
    join_room(&cmd_tx, newcomer, "desk").await;

    let events = settle(&cmd_tx, &mut event_rx).await;
    assert_eq!(
        events,
        vec![
            SentEvent {
                conn_id: host,
                event: ServerEvent::PeerDisconnected,
            },
            SentEvent {
                conn_id: newcomer,
                event: ServerEvent::RoomNotFound("Room not found".to_string()),
            },
        ]
    );
}

#[tokio::test]
async fn test_unpaired_host_disconnect_is_quiet() {
    init_tracing();

    let (cmd_tx, mut event_rx, _signaling) = create_test_registry();
    let host = ConnectionId::new();
    create_room(&cmd_tx, host, "lonely").await;
    settle(&cmd_tx, &mut event_rx).await;

    disconnect(&cmd_tx, host).await;

    assert!(settle(&cmd_tx, &mut event_rx).await.is_empty());
}

#[tokio::test]
async fn test_room_id_is_reusable_after_teardown() {
    init_tracing();

    let (cmd_tx, mut event_rx, _signaling) = create_test_registry();
    let host = ConnectionId::new();
    let client = ConnectionId::new();
    let next_host = ConnectionId::new();
    let next_client = ConnectionId::new();
    pair(&cmd_tx, &mut event_rx, host, client, "desk").await;

    disconnect(&cmd_tx, host).await;
    settle(&cmd_tx, &mut event_rx).await;
    pair(&cmd_tx, &mut event_rx, next_host, next_client, "desk").await;

    // The old client left with the torn-down group and hears nothing.
    send_signal(&cmd_tx, next_host, "desk", serde_json::json!("ping")).await;
    let events = settle(&cmd_tx, &mut event_rx).await;
    assert_eq!(
        events,
        vec![SentEvent {
            conn_id: next_client,
            event: ServerEvent::Signal {
                sender: next_host,
                signal: serde_json::json!("ping"),
            },
        }]
    );
}
