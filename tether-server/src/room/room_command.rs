use serde_json::{Map, Value};
use tether_core::{ClientEvent, ConnectionId, RoomId};

/// Commands delivered to the room registry by the connection layer.
#[derive(Debug)]
pub enum RoomCommand {
    CreateRoom {
        conn_id: ConnectionId,
        room_id: Option<RoomId>,
    },

    JoinRoom {
        conn_id: ConnectionId,
        room_id: Option<RoomId>,
    },

    /// SDP/ICE payload for the other member of the room.
    Signal {
        conn_id: ConnectionId,
        room_id: Option<RoomId>,
        signal: Value,
    },

    UsbDeviceList {
        conn_id: ConnectionId,
        room_id: Option<RoomId>,
        fields: Map<String, Value>,
    },

    UsbBindRequest {
        conn_id: ConnectionId,
        room_id: Option<RoomId>,
        bus_id: Value,
    },

    UsbShareResult {
        conn_id: ConnectionId,
        room_id: Option<RoomId>,
        fields: Map<String, Value>,
    },

    /// The connection is gone.
    Disconnect { conn_id: ConnectionId },
}

impl RoomCommand {
    pub fn from_event(conn_id: ConnectionId, event: ClientEvent) -> Self {
        match event {
            ClientEvent::CreateRoom { room_id } => RoomCommand::CreateRoom { conn_id, room_id },
            ClientEvent::JoinRoom { room_id } => RoomCommand::JoinRoom { conn_id, room_id },
            ClientEvent::Signal { room_id, signal } => RoomCommand::Signal {
                conn_id,
                room_id,
                signal,
            },
            ClientEvent::UsbDeviceList { room_id, fields } => RoomCommand::UsbDeviceList {
                conn_id,
                room_id,
                fields,
            },
            ClientEvent::UsbBindRequest { room_id, bus_id } => RoomCommand::UsbBindRequest {
                conn_id,
                room_id,
                bus_id,
            },
            ClientEvent::UsbShareResult { room_id, fields } => RoomCommand::UsbShareResult {
                conn_id,
                room_id,
                fields,
            },
        }
    }
}
