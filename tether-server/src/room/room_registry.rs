use crate::error::RelayError;
use crate::room::{Room, RoomCommand};
use crate::signaling::SignalingOutput;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tether_core::{ConnectionId, RoomId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Capacity of the command channel feeding the registry.
pub const COMMAND_CHANNEL_CAPACITY: usize = 100;

/// Single owner of every room and message group.
///
/// Commands are processed one at a time by [`RoomRegistry::run`], so each
/// check-then-set (seating a client, tearing down on disconnect) is atomic
/// with respect to every other peer event.
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    /// Message groups keyed by room id. Membership outlives the room entry in
    /// the cases the relay does not tear a group down (host eviction leaves
    /// the client behind).
    groups: HashMap<RoomId, HashSet<ConnectionId>>,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomRegistry {
    pub fn new(command_rx: mpsc::Receiver<RoomCommand>, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            rooms: HashMap::new(),
            groups: HashMap::new(),
            command_rx,
            signaling,
        }
    }

    /// Start a registry on the current runtime and return its command sender.
    pub fn spawn(signaling: Arc<dyn SignalingOutput>) -> mpsc::Sender<RoomCommand> {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let registry = Self::new(rx, signaling);
        tokio::spawn(registry.run());
        tx
    }

    pub async fn run(mut self) {
        info!("Room registry started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room registry stopped.");
    }

    pub async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::CreateRoom { conn_id, room_id } => self.create_room(conn_id, room_id).await,
            RoomCommand::JoinRoom { conn_id, room_id } => self.join_room(conn_id, room_id).await,
            RoomCommand::Signal {
                conn_id,
                room_id,
                signal,
            } => {
                let event = ServerEvent::Signal {
                    sender: conn_id,
                    signal,
                };
                self.forward(conn_id, room_id.as_ref(), event).await;
            }
            RoomCommand::UsbDeviceList {
                conn_id,
                room_id,
                fields,
            } => self.usb_device_list(conn_id, room_id, fields).await,
            RoomCommand::UsbBindRequest {
                conn_id,
                room_id,
                bus_id,
            } => {
                info!("USB bind request for {} in room: {:?}", bus_id, room_id);
                self.forward(conn_id, room_id.as_ref(), ServerEvent::UsbBindRequest(bus_id))
                    .await;
            }
            RoomCommand::UsbShareResult {
                conn_id,
                room_id,
                fields,
            } => {
                info!("USB share result in room: {:?}", room_id);
                self.forward(conn_id, room_id.as_ref(), ServerEvent::UsbShareResult(fields))
                    .await;
            }
            RoomCommand::Disconnect { conn_id } => self.disconnect(conn_id).await,
        }
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn group_members(&self, room_id: &RoomId) -> HashSet<ConnectionId> {
        self.groups.get(room_id).cloned().unwrap_or_default()
    }

    async fn create_room(&mut self, conn_id: ConnectionId, room_id: Option<RoomId>) {
        let Some(room_id) = room_id else {
            self.reject(conn_id, RelayError::MissingRoomId).await;
            return;
        };

        // A host keeps a single room: a refreshed page re-creating under a new
        // id must not leave the old id joinable.
        let stale: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.host == conn_id)
            .map(|room| room.id.clone())
            .collect();
        for stale_id in stale {
            self.leave_group(&stale_id, &conn_id);
            self.rooms.remove(&stale_id);
            info!("Evicted room {} previously hosted by {}", stale_id, conn_id);
        }

        self.join_group(&room_id, conn_id);
        if let Some(replaced) = self
            .rooms
            .insert(room_id.clone(), Room::new(room_id.clone(), conn_id))
        {
            warn!(
                "Room {} re-created by {}, replacing host {}",
                room_id, conn_id, replaced.host
            );
        }

        info!("Room created: {} by {}", room_id, conn_id);
        self.send(conn_id, ServerEvent::RoomCreated(room_id)).await;
    }

    async fn join_room(&mut self, conn_id: ConnectionId, room_id: Option<RoomId>) {
        let admitted = match room_id.as_ref().and_then(|id| self.rooms.get_mut(id)) {
            None => Err(RelayError::RoomNotFound),
            Some(room) => room.admit(conn_id).map(|()| (room.id.clone(), room.host)),
        };

        let (room_id, host) = match admitted {
            Ok(joined) => joined,
            Err(err) => {
                self.reject(conn_id, err).await;
                return;
            }
        };

        self.join_group(&room_id, conn_id);
        info!("User {} joined room: {}", conn_id, room_id);

        if host != conn_id {
            self.send(host, ServerEvent::ClientJoined(conn_id)).await;
        }
        self.send(conn_id, ServerEvent::JoinedRoom(room_id)).await;
    }

    async fn usb_device_list(
        &mut self,
        conn_id: ConnectionId,
        room_id: Option<RoomId>,
        fields: Map<String, Value>,
    ) {
        let Some(room_id) = room_id else {
            let err = RelayError::MissingRoomIdForForward {
                event: "usb-device-list",
            };
            self.reject(conn_id, err).await;
            return;
        };

        self.forward(conn_id, Some(&room_id), ServerEvent::UsbDeviceList(fields))
            .await;
        info!("USB device list sent in room: {}", room_id);
    }

    async fn disconnect(&mut self, conn_id: ConnectionId) {
        info!("User disconnected: {}", conn_id);

        let affected: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.has_participant(&conn_id))
            .map(|room| room.id.clone())
            .collect();

        for room_id in affected {
            self.rooms.remove(&room_id);
            let members = self.groups.remove(&room_id).unwrap_or_default();
            for member in members.into_iter().filter(|member| *member != conn_id) {
                self.send(member, ServerEvent::PeerDisconnected).await;
            }
            info!("Room {} closed after {} disconnected", room_id, conn_id);
        }

        // A closed connection belongs to no group, including groups of rooms it
        // was displaced from.
        self.groups.retain(|_, members| {
            members.remove(&conn_id);
            !members.is_empty()
        });
    }

    /// Deliver `event` to every member of the room's group except `sender`.
    /// Unknown or empty groups are a silent no-op.
    async fn forward(&self, sender: ConnectionId, room_id: Option<&RoomId>, event: ServerEvent) {
        let recipients: Vec<ConnectionId> = room_id
            .and_then(|id| self.groups.get(id))
            .map(|members| {
                members
                    .iter()
                    .filter(|member| **member != sender)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            "Forwarding {} from {} in room {:?} to {} peer(s)",
            event.name(),
            sender,
            room_id,
            recipients.len()
        );

        for recipient in recipients {
            self.send(recipient, event.clone()).await;
        }
    }

    async fn reject(&self, conn_id: ConnectionId, err: RelayError) {
        debug!("Rejecting request from {}: {}", conn_id, err);
        self.send(conn_id, err.to_event()).await;
    }

    async fn send(&self, conn_id: ConnectionId, event: ServerEvent) {
        self.signaling.send_event(conn_id, event).await;
    }

    fn join_group(&mut self, room_id: &RoomId, conn_id: ConnectionId) {
        self.groups.entry(room_id.clone()).or_default().insert(conn_id);
    }

    fn leave_group(&mut self, room_id: &RoomId, conn_id: &ConnectionId) {
        let Some(members) = self.groups.get_mut(room_id) else {
            return;
        };
        members.remove(conn_id);
        if members.is_empty() {
            self.groups.remove(room_id);
        }
    }
}
