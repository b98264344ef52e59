use serde_json::json;
use tether_core::{ConnectionId, ServerEvent};

use crate::integration::{create_test_registry, init_tracing};
use crate::utils::{SentEvent, create_room, pair, send_signal, settle};

#[tokio::test]
async fn test_signal_goes_to_counterpart_untouched() {
    init_tracing();

    let (cmd_tx, mut event_rx, _signaling) = create_test_registry();
    let host = ConnectionId::new();
    let client = ConnectionId::new();
    pair(&cmd_tx, &mut event_rx, host, client, "desk").await;

    let offer = json!({
        "type": "offer",
        "sdp": "v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\n",
    });
    let candidate = json!({"candidate": "candidate:1 1 udp 2122260223 10.0.0.2 54321 typ host", "sdpMid": "0"});

    send_signal(&cmd_tx, host, "desk", offer.clone()).await;
    send_signal(&cmd_tx, client, "desk", candidate.clone()).await;

    let events = settle(&cmd_tx, &mut event_rx).await;
    assert_eq!(
        events,
        vec![
            SentEvent {
                conn_id: client,
                event: ServerEvent::Signal {
                    sender: host,
                    signal: offer,
                },
            },
            SentEvent {
                conn_id: host,
                event: ServerEvent::Signal {
                    sender: client,
                    signal: candidate,
                },
            },
        ]
    );
}

#[tokio::test]
async fn test_signal_before_join_reaches_nobody() {
    init_tracing();

    let (cmd_tx, mut event_rx, _signaling) = create_test_registry();
    let host = ConnectionId::new();
    create_room(&cmd_tx, host, "desk").await;
    settle(&cmd_tx, &mut event_rx).await;

    send_signal(&cmd_tx, host, "desk", json!({"type": "offer"})).await;
    send_signal(&cmd_tx, host, "missing", json!({"type": "offer"})).await;

    assert!(settle(&cmd_tx, &mut event_rx).await.is_empty());
}
