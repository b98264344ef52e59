use crate::room::{RoomCommand, RoomRegistry};
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use tether_core::{ConnectionId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

/// Live WebSocket connections plus the command channel of the room registry.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) room_cmd_tx: mpsc::Sender<RoomCommand>,
}

impl SignalingService {
    pub fn new(room_cmd_tx: mpsc::Sender<RoomCommand>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
            room_cmd_tx,
        }
    }

    /// Wire a fresh service to a newly spawned room registry.
    pub fn start() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(crate::room::COMMAND_CHANNEL_CAPACITY);
        let service = Self::new(cmd_tx);

        let registry = RoomRegistry::new(cmd_rx, Arc::new(service.clone()));
        tokio::spawn(registry.run());

        service
    }

    pub fn add_peer(&self, conn_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(conn_id, tx);
    }

    pub fn remove_peer(&self, conn_id: &ConnectionId) {
        self.inner.peers.remove(conn_id);
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }

    pub fn send_signal(&self, conn_id: ConnectionId, event: ServerEvent) {
        if let Some(peer) = self.inner.peers.get(&conn_id) {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if let Err(e) = peer.send(Message::Text(json.into())) {
                        error!("Failed to send WS message to {}: {:?}", conn_id, e);
                    }
                }
                Err(e) => error!("Failed to serialize {} event: {}", event.name(), e),
            }
        } else {
            warn!(
                "Attempted to send {} to disconnected user {}",
                event.name(),
                conn_id
            );
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_event(&self, conn_id: ConnectionId, event: ServerEvent) {
        self.send_signal(conn_id, event);
    }
}
