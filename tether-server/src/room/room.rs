use crate::error::RelayError;
use tether_core::{ConnectionId, RoomId};

/// One rendezvous: the peer that created it and, once joined, its counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub host: ConnectionId,
    pub client: Option<ConnectionId>,
}

impl Room {
    pub fn new(id: RoomId, host: ConnectionId) -> Self {
        Self {
            id,
            host,
            client: None,
        }
    }

    pub fn is_paired(&self) -> bool {
        self.client.is_some()
    }

    pub fn has_participant(&self, conn_id: &ConnectionId) -> bool {
        self.host == *conn_id || self.client.as_ref() == Some(conn_id)
    }

    /// Seat `conn_id` as the client. The seat is filled at most once.
    pub fn admit(&mut self, conn_id: ConnectionId) -> Result<(), RelayError> {
        if self.is_paired() {
            return Err(RelayError::RoomFull);
        }
        self.client = Some(conn_id);
        Ok(())
    }
}
