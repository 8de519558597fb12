use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

use crate::gamepad::Profile;

pub const SETTINGS_FILE: &str = "receiver.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub restart_pulse_ms: u64,
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    restart_pulse_ms: Option<u64>,
    profile: Option<Profile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5005".into(),
            restart_pulse_ms: 100,
            profile: Profile::default(),
        }
    }
}

impl Settings {
    pub fn restart_pulse(&self) -> Duration {
        Duration::from_millis(self.restart_pulse_ms)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.bind_addr = v;
                }
                if let Some(v) = file_cfg.restart_pulse_ms {
                    settings.restart_pulse_ms = v;
                }
                if let Some(v) = file_cfg.profile {
                    settings.profile = v;
                }
            }
            Err(err) => warn!(path = %path.display(), "receiver: ignoring settings file: {err}"),
        }
    }

    if let Some(v) = env("RECEIVER_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__RESTART_PULSE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.restart_pulse_ms = parsed;
        }
    }
    if let Some(v) = env("APP__PROFILE") {
        match v.parse::<Profile>() {
            Ok(profile) => settings.profile = profile,
            Err(err) => warn!("receiver: ignoring APP__PROFILE: {err}"),
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
