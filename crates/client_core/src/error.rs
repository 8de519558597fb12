use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a streaming session is already active")]
    AlreadyActive,
    #[error("failed to open datagram channel to {endpoint}: {source}")]
    OpenChannel {
        endpoint: String,
        source: anyhow::Error,
    },
}
