use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::transport::{DatagramChannel, DatagramTransport, Endpoint};

#[derive(Default)]
pub struct Recorded {
    payloads: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    opened: AtomicUsize,
    released: AtomicUsize,
}

impl Recorded {
    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().expect("payloads").clone()
    }

    pub fn sent(&self) -> usize {
        self.payloads.lock().expect("payloads").len()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// In-memory transport that records every payload and channel lifecycle.
#[derive(Default, Clone)]
pub struct RecordingTransport {
    pub recorded: Arc<Recorded>,
    fail_open: bool,
    fail_sends: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn failing_sends() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }
}

struct RecordingChannel {
    recorded: Arc<Recorded>,
    fail_sends: bool,
}

#[async_trait]
impl DatagramTransport for RecordingTransport {
    async fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn DatagramChannel>> {
        if self.fail_open {
            return Err(anyhow!("network unreachable: {endpoint}"));
        }
        self.recorded.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingChannel {
            recorded: Arc::clone(&self.recorded),
            fail_sends: self.fail_sends,
        }))
    }
}

#[async_trait]
impl DatagramChannel for RecordingChannel {
    async fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.recorded.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_sends {
            return Err(anyhow!("send failed: no buffer space available"));
        }
        self.recorded
            .payloads
            .lock()
            .expect("payloads")
            .push(String::from_utf8_lossy(payload).into_owned());
        Ok(())
    }
}

impl Drop for RecordingChannel {
    fn drop(&mut self) {
        self.recorded.released.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn test_endpoint() -> Endpoint {
    Endpoint::new("127.0.0.1", 5005)
}

/// Polls `condition` until it holds or `timeout` elapses.
pub async fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    condition()
}
