use serde_json::json;
use tether_core::{RoomId, ServerEvent};

use crate::integration::init_tracing;
use crate::utils::{TestClient, spawn_server};

#[tokio::test]
async fn test_full_peer_cycle() {
    init_tracing();

    let addr = spawn_server().await;
    let mut host = TestClient::connect(addr).await.expect("Host failed to connect");
    let mut client = TestClient::connect(addr)
        .await
        .expect("Client failed to connect");
    assert_ne!(host.conn_id, client.conn_id);

    host.send(json!({"event": "create-room", "data": "usb-lab"}))
        .await
        .unwrap();
    assert_eq!(
        host.recv().await.unwrap(),
        ServerEvent::RoomCreated(RoomId::from("usb-lab"))
    );

    client
        .send(json!({"event": "join-room", "data": "usb-lab"}))
        .await
        .unwrap();
    assert_eq!(
        client.recv().await.unwrap(),
        ServerEvent::JoinedRoom(RoomId::from("usb-lab"))
    );
    assert_eq!(
        host.recv().await.unwrap(),
        ServerEvent::ClientJoined(client.conn_id)
    );

    let offer = json!({"type": "offer", "sdp": "v=0\r\n"});
    host.send(json!({"event": "signal", "data": {"roomId": "usb-lab", "signal": offer}}))
        .await
        .unwrap();
    assert_eq!(
        client.recv().await.unwrap(),
        ServerEvent::Signal {
            sender: host.conn_id,
            signal: offer,
        }
    );

    host.send(json!({
        "event": "usb-device-list",
        "data": {"roomId": "usb-lab", "devices": [{"busId": "1-1"}]}
    }))
    .await
    .unwrap();
    let ServerEvent::UsbDeviceList(fields) = client.recv().await.unwrap() else {
        panic!("expected usb-device-list");
    };
    assert_eq!(fields.get("devices"), Some(&json!([{"busId": "1-1"}])));
    assert!(!fields.contains_key("roomId"));

    client
        .send(json!({"event": "usb-bind-request", "data": {"roomId": "usb-lab", "busId": "1-1"}}))
        .await
        .unwrap();
    assert_eq!(
        host.recv().await.unwrap(),
        ServerEvent::UsbBindRequest(json!("1-1"))
    );

    host.send(json!({
        "event": "usb-share-result",
        "data": {"roomId": "usb-lab", "ip": "10.0.0.7", "busId": "1-1"}
    }))
    .await
    .unwrap();
    let ServerEvent::UsbShareResult(fields) = client.recv().await.unwrap() else {
        panic!("expected usb-share-result");
    };
    assert_eq!(fields.get("ip"), Some(&json!("10.0.0.7")));
    assert_eq!(fields.get("busId"), Some(&json!("1-1")));

    host.close().await.expect("Failed to close host");
    assert_eq!(client.recv().await.unwrap(), ServerEvent::PeerDisconnected);

    let mut latecomer = TestClient::connect(addr)
        .await
        .expect("Latecomer failed to connect");
    latecomer
        .send(json!({"event": "join-room", "data": "usb-lab"}))
        .await
        .unwrap();
    assert_eq!(
        latecomer.recv().await.unwrap(),
        ServerEvent::RoomNotFound("Room not found".to_string())
    );

    client.close().await.expect("Failed to close client");
    latecomer.close().await.expect("Failed to close latecomer");
}
