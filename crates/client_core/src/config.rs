use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::{session::DEFAULT_SEND_INTERVAL, transport::Endpoint};

pub const SETTINGS_FILE: &str = "controller.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub target_host: String,
    pub target_port: u16,
    pub send_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
struct FileSettings {
    target_host: Option<String>,
    target_port: Option<u16>,
    send_interval_ms: Option<u64>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            target_host: "192.168.1.189".into(),
            target_port: 5005,
            send_interval_ms: DEFAULT_SEND_INTERVAL.as_millis() as u64,
        }
    }
}

impl ControllerSettings {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.target_host.clone(), self.target_port)
    }

    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms.max(1))
    }
}

/// Defaults, then `controller.toml` in the working directory, then `APP__*`
/// environment variables.
pub fn load_settings() -> ControllerSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ControllerSettings {
    let mut settings = ControllerSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<FileSettings>(&raw) {
            if let Some(v) = file_cfg.target_host {
                settings.target_host = v;
            }
            if let Some(v) = file_cfg.target_port {
                settings.target_port = v;
            }
            if let Some(v) = file_cfg.send_interval_ms {
                settings.send_interval_ms = v;
            }
        }
    }

    if let Some(v) = env("APP__TARGET_HOST") {
        settings.target_host = v;
    }
    if let Some(v) = env("APP__TARGET_PORT") {
        if let Ok(parsed) = v.parse::<u16>() {
            settings.target_port = parsed;
        }
    }
    if let Some(v) = env("APP__SEND_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.send_interval_ms = parsed;
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings_from(&dir.path().join("absent.toml"), no_env);
        assert_eq!(settings, ControllerSettings::default());
        assert_eq!(settings.endpoint(), Endpoint::new("192.168.1.189", 5005));
        assert_eq!(settings.send_interval(), Duration::from_millis(50));
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "target_host = \"10.0.0.7\"\ntarget_port = 6000\nsend_interval_ms = 20"
        )
        .expect("write");

        let settings = load_settings_from(file.path(), no_env);
        assert_eq!(settings.endpoint(), Endpoint::new("10.0.0.7", 6000));
        assert_eq!(settings.send_interval_ms, 20);
    }

    #[test]
    fn env_overrides_file_and_bad_numbers_are_ignored() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "target_host = \"10.0.0.7\"\ntarget_port = 6000").expect("write");

        let settings = load_settings_from(file.path(), |key| match key {
            "APP__TARGET_HOST" => Some("127.0.0.1".to_string()),
            "APP__TARGET_PORT" => Some("not-a-port".to_string()),
            "APP__SEND_INTERVAL_MS" => Some("10".to_string()),
            _ => None,
        });
        assert_eq!(settings.target_host, "127.0.0.1");
        assert_eq!(settings.target_port, 6000);
        assert_eq!(settings.send_interval(), Duration::from_millis(10));
    }

    #[test]
    fn zero_interval_is_floored() {
        let settings = ControllerSettings {
            send_interval_ms: 0,
            ..ControllerSettings::default()
        };
        assert_eq!(settings.send_interval(), Duration::from_millis(1));
    }
}
