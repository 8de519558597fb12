use std::sync::Arc;

use anyhow::Result;
use shared::{domain::Command, protocol::Datagram};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::transport::{DatagramTransport, Endpoint};

/// Sends single command datagrams on a channel of their own, independent of
/// any streaming session and of the control state.
pub struct CommandSender {
    endpoint: Endpoint,
    transport: Arc<dyn DatagramTransport>,
}

impl CommandSender {
    pub fn new(endpoint: Endpoint, transport: Arc<dyn DatagramTransport>) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    /// Opens a channel, sends `command` once, releases the channel.
    ///
    /// Failures are logged and swallowed; there is no retry.
    pub async fn send_command(&self, command: Command) {
        match self.try_send(command).await {
            Ok(()) => info!(endpoint = %self.endpoint, %command, "command: sent"),
            Err(err) => warn!(endpoint = %self.endpoint, %command, "command: send failed: {err:#}"),
        }
    }

    /// Fire-and-forget variant for callers that cannot await.
    pub fn spawn_command(self: &Arc<Self>, command: Command) -> JoinHandle<()> {
        let sender = Arc::clone(self);
        tokio::spawn(async move { sender.send_command(command).await })
    }

    async fn try_send(&self, command: Command) -> Result<()> {
        let mut channel = self.transport.open(&self.endpoint).await?;
        channel
            .send(Datagram::from(command).encode().as_bytes())
            .await
    }
}
