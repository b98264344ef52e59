use async_trait::async_trait;
use tether_core::{ConnectionId, ServerEvent};

/// Delivery side of the connection layer, used by the room registry to reach
/// peers. Delivery is fire-and-forget: an event for a connection that is
/// already gone is dropped.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_event(&self, conn_id: ConnectionId, event: ServerEvent);
}
