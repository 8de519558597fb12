use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, orientation::gravity_for_roll, Controller, ControllerSettings, Pedal,
    SensorKind,
};
use shared::domain::{Command, AXIS_MAX};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Stand-in magnetic reading; any field not parallel to gravity gives a fix.
const SIMULATED_MAGNETIC: [f32; 3] = [22.0, 5.0, -40.0];
/// Touch zones are simulated on a region this many units tall.
const ZONE_HEIGHT: f32 = 1000.0;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    interval_ms: Option<u64>,
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Stream a fixed tilt and pedal position for a while.
    Stream {
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        roll: f32,
        #[arg(long, default_value_t = 0)]
        throttle: u16,
        #[arg(long, default_value_t = 0)]
        brake: u16,
        #[arg(long, default_value_t = 5)]
        seconds: u64,
    },
    /// Send one restart command.
    Restart,
}

impl Args {
    fn settings(&self) -> ControllerSettings {
        let mut settings = load_settings();
        if let Some(host) = &self.host {
            settings.target_host = host.clone();
        }
        if let Some(port) = self.port {
            settings.target_port = port;
        }
        if let Some(ms) = self.interval_ms {
            settings.send_interval_ms = ms;
        }
        settings
    }
}

/// Touch coordinate that produces `value` on a zone of [`ZONE_HEIGHT`].
fn touch_y_for(value: u16) -> f32 {
    let value = value.min(AXIS_MAX);
    ZONE_HEIGHT * (1.0 - f32::from(value) / f32::from(AXIS_MAX))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();
    let settings = args.settings();
    let controller = Controller::new(&settings);

    match args.action {
        Action::Restart => {
            controller.send_command(Command::Restart).await;
        }
        Action::Stream {
            roll,
            throttle,
            brake,
            seconds,
        } => {
            controller.on_sensor(SensorKind::Gravity, gravity_for_roll(roll));
            controller.on_sensor(SensorKind::Magnetic, SIMULATED_MAGNETIC);

            let throttle_zone = controller.touch_zone(Pedal::Throttle, ZONE_HEIGHT);
            let brake_zone = controller.touch_zone(Pedal::Brake, ZONE_HEIGHT);
            if throttle > 0 {
                throttle_zone.press(touch_y_for(throttle));
            }
            if brake > 0 {
                brake_zone.press(touch_y_for(brake));
            }

            controller
                .start()
                .await
                .context("failed to start streaming")?;
            info!(
                roll = controller.roll_degrees(),
                status = %controller.status(),
                "controller: streaming"
            );

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
                Ok(()) = tokio::signal::ctrl_c() => info!("controller: interrupted"),
            }

            throttle_zone.release();
            brake_zone.release();
            controller.pause().await;
            info!(status = %controller.status(), "controller: done");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use client_core::map_touch_to_axis;

    use super::*;

    #[test]
    fn simulated_touch_hits_requested_value() {
        for value in [0, 1, 5000, 16384, 32767] {
            assert_eq!(map_touch_to_axis(touch_y_for(value), ZONE_HEIGHT), value);
        }
    }

    #[test]
    fn parses_stream_with_negative_roll() {
        let args = Args::parse_from([
            "controller", "--host", "127.0.0.1", "stream", "--roll", "-30", "--throttle", "100",
        ]);
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        match args.action {
            Action::Stream { roll, throttle, .. } => {
                assert_eq!(roll, -30.0);
                assert_eq!(throttle, 100);
            }
            Action::Restart => panic!("expected stream"),
        }
    }
}
