use std::{fmt, sync::Arc, time::Duration};

use shared::protocol::encode_frame;
use tokio::{
    sync::{oneshot, watch, Mutex},
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, error, info, warn};

use crate::{
    control_state::ControlState,
    error::SessionError,
    transport::{DatagramChannel, DatagramTransport, Endpoint},
};

pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Sending,
}

impl SessionStatus {
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Sending)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => f.write_str("Status: Not connected"),
            SessionStatus::Sending => f.write_str("Status: Sending data..."),
        }
    }
}

struct ActiveStream {
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

pub struct StreamingSession {
    endpoint: Endpoint,
    transport: Arc<dyn DatagramTransport>,
    state: Arc<ControlState>,
    interval: Duration,
    active: Mutex<Option<ActiveStream>>,
    status: watch::Sender<SessionStatus>,
}

impl StreamingSession {
    pub fn new(
        endpoint: Endpoint,
        transport: Arc<dyn DatagramTransport>,
        state: Arc<ControlState>,
        interval: Duration,
    ) -> Self {
        let (status, _) = watch::channel(SessionStatus::Idle);
        Self {
            endpoint,
            transport,
            state,
            interval,
            active: Mutex::new(None),
            status,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Opens the channel and spawns the send loop.
    ///
    /// Fails with [`SessionError::AlreadyActive`] if a loop is running, and
    /// with [`SessionError::OpenChannel`] if the channel cannot be opened; in
    /// both cases no new loop is started.
    pub async fn start(&self) -> Result<(), SessionError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(SessionError::AlreadyActive);
        }
        self.start_locked(&mut active).await
    }

    /// Cancels the send loop and waits until it has released its channel.
    ///
    /// A no-op when idle.
    pub async fn stop(&self) {
        let mut active = self.active.lock().await;
        self.stop_locked(&mut active).await;
    }

    /// Stops when active, starts when idle. Returns the resulting status.
    pub async fn toggle(&self) -> Result<SessionStatus, SessionError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            self.stop_locked(&mut active).await;
        } else {
            self.start_locked(&mut active).await?;
        }
        Ok(self.status())
    }

    async fn start_locked(&self, active: &mut Option<ActiveStream>) -> Result<(), SessionError> {
        let channel =
            self.transport
                .open(&self.endpoint)
                .await
                .map_err(|source| SessionError::OpenChannel {
                    endpoint: self.endpoint.to_string(),
                    source,
                })?;

        let (cancel, cancelled) = oneshot::channel();
        let task = tokio::spawn(run_stream(
            channel,
            Arc::clone(&self.state),
            self.interval,
            self.endpoint.to_string(),
            cancelled,
        ));
        *active = Some(ActiveStream { cancel, task });
        self.status.send_replace(SessionStatus::Sending);

        info!(
            endpoint = %self.endpoint,
            interval_ms = self.interval.as_millis() as u64,
            "stream: started"
        );
        Ok(())
    }

    async fn stop_locked(&self, active: &mut Option<ActiveStream>) {
        let Some(stream) = active.take() else {
            return;
        };

        self.status.send_replace(SessionStatus::Idle);
        let _ = stream.cancel.send(());
        if let Err(err) = stream.task.await {
            error!(endpoint = %self.endpoint, "stream: send loop ended abnormally: {err}");
        }
        info!(endpoint = %self.endpoint, "stream: stopped");
    }
}

impl Drop for StreamingSession {
    fn drop(&mut self) {
        // Wake the loop so it releases its channel.
        if let Some(stream) = self.active.get_mut().take() {
            let _ = stream.cancel.send(());
            debug!(endpoint = %self.endpoint, "stream: cancelled on drop");
        }
    }
}

async fn run_stream(
    mut channel: Box<dyn DatagramChannel>,
    state: Arc<ControlState>,
    interval: Duration,
    endpoint: String,
    mut cancelled: oneshot::Receiver<()>,
) {
    let mut cycles: u64 = 0;
    let mut failures: u64 = 0;

    loop {
        let payload = encode_frame(&state.snapshot());

        tokio::select! {
            biased;
            _ = &mut cancelled => break,
            result = channel.send(payload.as_bytes()) => {
                cycles += 1;
                if let Err(err) = result {
                    failures += 1;
                    warn!(endpoint = %endpoint, failures, "stream: send failed: {err:#}");
                }
            }
        }

        tokio::select! {
            biased;
            _ = &mut cancelled => break,
            _ = sleep(interval) => {}
        }
    }

    drop(channel);
    debug!(endpoint = %endpoint, cycles, failures, "stream: channel released");
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
