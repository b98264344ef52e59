use crate::model::connection::ConnectionId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key carrying the room id inside object payloads. It is stripped before
/// the remaining fields are forwarded.
const ROOM_ID_FIELD: &str = "roomId";
const SIGNAL_FIELD: &str = "signal";
const BUS_ID_FIELD: &str = "busId";

/// Events a peer sends to the relay.
///
/// Frames look like `{"event": "create-room", "data": "my-room"}`. A room id
/// that is missing, empty or not a string decodes to `room_id: None`, so a
/// present `RoomId` is never empty. Only an unknown event name or a frame
/// without `event` fails to decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawClientEvent")]
pub enum ClientEvent {
    CreateRoom {
        room_id: Option<RoomId>,
    },
    JoinRoom {
        room_id: Option<RoomId>,
    },
    /// Connection negotiation payload (SDP, ICE), forwarded untouched.
    Signal {
        room_id: Option<RoomId>,
        signal: Value,
    },
    UsbDeviceList {
        room_id: Option<RoomId>,
        fields: Map<String, Value>,
    },
    UsbBindRequest {
        room_id: Option<RoomId>,
        bus_id: Value,
    },
    UsbShareResult {
        room_id: Option<RoomId>,
        fields: Map<String, Value>,
    },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::CreateRoom { .. } => "create-room",
            ClientEvent::JoinRoom { .. } => "join-room",
            ClientEvent::Signal { .. } => "signal",
            ClientEvent::UsbDeviceList { .. } => "usb-device-list",
            ClientEvent::UsbBindRequest { .. } => "usb-bind-request",
            ClientEvent::UsbShareResult { .. } => "usb-share-result",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
enum EventName {
    CreateRoom,
    JoinRoom,
    Signal,
    UsbDeviceList,
    UsbBindRequest,
    UsbShareResult,
}

#[derive(Deserialize)]
struct RawClientEvent {
    event: EventName,
    #[serde(default)]
    data: Value,
}

impl From<RawClientEvent> for ClientEvent {
    fn from(raw: RawClientEvent) -> Self {
        match raw.event {
            EventName::CreateRoom => ClientEvent::CreateRoom {
                room_id: room_id_from(raw.data),
            },
            EventName::JoinRoom => ClientEvent::JoinRoom {
                room_id: room_id_from(raw.data),
            },
            EventName::Signal => {
                let (room_id, mut fields) = split_room_id(raw.data);
                ClientEvent::Signal {
                    room_id,
                    signal: fields.remove(SIGNAL_FIELD).unwrap_or(Value::Null),
                }
            }
            EventName::UsbDeviceList => {
                let (room_id, fields) = split_room_id(raw.data);
                ClientEvent::UsbDeviceList { room_id, fields }
            }
            EventName::UsbBindRequest => {
                let (room_id, mut fields) = split_room_id(raw.data);
                ClientEvent::UsbBindRequest {
                    room_id,
                    bus_id: fields.remove(BUS_ID_FIELD).unwrap_or(Value::Null),
                }
            }
            EventName::UsbShareResult => {
                let (room_id, fields) = split_room_id(raw.data);
                ClientEvent::UsbShareResult { room_id, fields }
            }
        }
    }
}

/// Only a non-empty string names a room; anything else counts as absent.
fn room_id_from(value: Value) -> Option<RoomId> {
    match value {
        Value::String(id) if !id.is_empty() => Some(RoomId::from(id)),
        _ => None,
    }
}

/// Non-object payloads carry neither a room id nor fields.
fn split_room_id(data: Value) -> (Option<RoomId>, Map<String, Value>) {
    let mut fields = match data {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    let room_id = fields.remove(ROOM_ID_FIELD).and_then(room_id_from);
    (room_id, fields)
}

/// Events the relay delivers to a peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// First frame on every connection: the id other peers will see.
    Connected(ConnectionId),
    RoomCreated(RoomId),
    RoomError(String),
    JoinedRoom(RoomId),
    RoomFull(String),
    RoomNotFound(String),
    /// Sent to the host when a second peer joins its room.
    ClientJoined(ConnectionId),
    Signal {
        sender: ConnectionId,
        signal: Value,
    },
    UsbDeviceList(Map<String, Value>),
    UsbBindRequest(Value),
    UsbShareResult(Map<String, Value>),
    PeerDisconnected,
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connected(_) => "connected",
            ServerEvent::RoomCreated(_) => "room-created",
            ServerEvent::RoomError(_) => "room-error",
            ServerEvent::JoinedRoom(_) => "joined-room",
            ServerEvent::RoomFull(_) => "room-full",
            ServerEvent::RoomNotFound(_) => "room-not-found",
            ServerEvent::ClientJoined(_) => "client-joined",
            ServerEvent::Signal { .. } => "signal",
            ServerEvent::UsbDeviceList(_) => "usb-device-list",
            ServerEvent::UsbBindRequest(_) => "usb-bind-request",
            ServerEvent::UsbShareResult(_) => "usb-share-result",
            ServerEvent::PeerDisconnected => "peer-disconnected",
        }
    }
}
