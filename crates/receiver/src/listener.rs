use std::{future::Future, net::SocketAddr, time::Duration};

use anyhow::{Context, Result};
use shared::{
    domain::Command,
    error::ProtocolError,
    protocol::{Datagram, MAX_DATAGRAM_LEN},
};
use tokio::{net::UdpSocket, time::sleep};
use tracing::{info, warn};

use crate::gamepad::{Profile, VirtualGamepad};

pub const RESTART_BUTTON: u8 = 1;

pub struct Listener<G> {
    socket: UdpSocket,
    gamepad: G,
    profile: Profile,
    restart_pulse: Duration,
}

impl<G: VirtualGamepad> Listener<G> {
    pub async fn bind(
        bind_addr: &str,
        gamepad: G,
        profile: Profile,
        restart_pulse: Duration,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(bind_addr)
            .await
            .with_context(|| format!("failed to bind udp listener on {bind_addr}"))?;
        Ok(Self {
            socket,
            gamepad,
            profile,
            restart_pulse,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .context("failed to read listener address")
    }

    #[cfg(test)]
    pub fn gamepad(&self) -> &G {
        &self.gamepad
    }

    /// Decodes one datagram and drives the gamepad with it.
    pub async fn handle(&mut self, bytes: &[u8]) -> Result<Datagram, ProtocolError> {
        let datagram = Datagram::decode(bytes)?;
        match datagram {
            Datagram::Control(frame) => self.gamepad.set_axes(self.profile.axes(frame)),
            Datagram::Command(Command::Restart) => self.pulse_restart().await,
        }
        Ok(datagram)
    }

    async fn pulse_restart(&mut self) {
        info!(button = RESTART_BUTTON, "receiver: restart requested");
        self.gamepad.set_button(RESTART_BUTTON, true);
        sleep(self.restart_pulse).await;
        self.gamepad.set_button(RESTART_BUTTON, false);
    }

    /// Receives until `shutdown` resolves. Bad datagrams are logged and skipped.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<G> {
        tokio::pin!(shutdown);
        let mut buf = vec![0u8; MAX_DATAGRAM_LEN];

        loop {
            let (len, peer) = tokio::select! {
                _ = &mut shutdown => break,
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok(received) => received,
                    Err(err) => {
                        warn!("receiver: recv failed: {err}");
                        continue;
                    }
                },
            };

            if let Err(err) = self.handle(&buf[..len]).await {
                warn!(%peer, "receiver: dropped datagram: {err}");
            }
        }

        info!("receiver: shutting down");
        Ok(self.gamepad)
    }
}

#[cfg(test)]
#[path = "tests/listener_tests.rs"]
mod tests;
