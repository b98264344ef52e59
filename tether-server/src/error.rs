//! Errors reported back to peers.
//!
//! None of these stop the relay: each one becomes an event delivered to the
//! connection that caused it, and the peer decides whether to retry.

use tether_core::ServerEvent;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Room id is required")]
    MissingRoomId,

    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is full")]
    RoomFull,

    /// A forwarded event that must name its room arrived without one.
    #[error("roomId is required for {event}")]
    MissingRoomIdForForward { event: &'static str },
}

impl RelayError {
    /// The event delivered to the offending connection.
    pub fn to_event(&self) -> ServerEvent {
        let message = self.to_string();
        match self {
            RelayError::MissingRoomId | RelayError::MissingRoomIdForForward { .. } => {
                ServerEvent::RoomError(message)
            }
            RelayError::RoomNotFound => ServerEvent::RoomNotFound(message),
            RelayError::RoomFull => ServerEvent::RoomFull(message),
        }
    }
}
