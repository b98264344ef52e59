use crate::{RoomCommand, SignalingService};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tether_core::{ClientEvent, ConnectionId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let conn_id = ConnectionId::new();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(conn_id, tx);
    info!("A user connected: {} ({} live)", conn_id, service.peer_count());
    service.send_signal(conn_id, ServerEvent::Connected(conn_id));

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            debug!("{} from {}", event.name(), conn_id);
                            let cmd = RoomCommand::from_event(conn_id, event);
                            if let Err(e) = service.room_cmd_tx.send(cmd).await {
                                error!("Room registry died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid event from {}: {}", conn_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&conn_id);
    if let Err(e) = service
        .room_cmd_tx
        .send(RoomCommand::Disconnect { conn_id })
        .await
    {
        error!("Room registry died before {} disconnected: {}", conn_id, e);
    }
    info!("WebSocket disconnected: {}", conn_id);
}
