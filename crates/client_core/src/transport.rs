use std::fmt;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[async_trait]
pub trait DatagramChannel: Send {
    async fn send(&mut self, payload: &[u8]) -> Result<()>;
}

#[async_trait]
pub trait DatagramTransport: Send + Sync {
    async fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn DatagramChannel>>;
}

/// UDP transport: one ephemeral socket per channel, connected to the endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpTransport;

struct UdpChannel {
    socket: UdpSocket,
    endpoint: String,
}

#[async_trait]
impl DatagramTransport for UdpTransport {
    async fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn DatagramChannel>> {
        let target = lookup_host((endpoint.host.as_str(), endpoint.port))
            .await
            .with_context(|| format!("failed to resolve {endpoint}"))?
            .next()
            .ok_or_else(|| anyhow!("no address found for {endpoint}"))?;

        let local = if target.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(local)
            .await
            .context("failed to bind local udp socket")?;
        socket
            .connect(target)
            .await
            .with_context(|| format!("failed to set udp peer {target}"))?;

        debug!(endpoint = %endpoint, peer = %target, "udp: channel opened");
        Ok(Box::new(UdpChannel {
            socket,
            endpoint: endpoint.to_string(),
        }))
    }
}

#[async_trait]
impl DatagramChannel for UdpChannel {
    async fn send(&mut self, payload: &[u8]) -> Result<()> {
        let written = self
            .socket
            .send(payload)
            .await
            .with_context(|| format!("udp send to {} failed", self.endpoint))?;
        if written != payload.len() {
            return Err(anyhow!(
                "short udp send to {}: {written} of {} bytes",
                self.endpoint,
                payload.len()
            ));
        }
        Ok(())
    }
}

impl Drop for UdpChannel {
    fn drop(&mut self) {
        debug!(endpoint = %self.endpoint, "udp: channel released");
    }
}
