use std::future::Future;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod gamepad;
mod listener;

use config::load_settings;
use gamepad::LoggingGamepad;
use listener::Listener;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let listener = Listener::bind(
        &settings.bind_addr,
        LoggingGamepad::default(),
        settings.profile,
        settings.restart_pulse(),
    )
    .await?;
    info!(
        addr = %listener.local_addr()?,
        profile = %settings.profile,
        "receiver: listening for control datagrams"
    );

    let gamepad = listener
        .run(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;
    info!(last = ?gamepad.last(), "receiver: stopped");
    Ok(())
}

/// Resolves once `signal` fires. If the handler could not be installed the
/// receiver keeps running until killed.
async fn shutdown_signal(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(err) = signal.await {
        error!("receiver: failed to listen for ctrl-c, running until killed: {err}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::{io, time::Duration};

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn shutdown_follows_the_signal() {
        timeout(Duration::from_secs(1), shutdown_signal(async { Ok(()) }))
            .await
            .expect("shutdown resolves");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_signal_install_never_shuts_down() {
        let failed = async { Err(io::Error::other("no handler")) };
        assert!(
            timeout(Duration::from_secs(3600), shutdown_signal(failed))
                .await
                .is_err()
        );
    }
}
