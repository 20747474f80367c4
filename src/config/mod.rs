use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::time::Duration;

use crate::notifications::machine::MAX_DWELL;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    pub dwell_secs: u64,
    pub display_enabled: bool,
}

impl NotificationConfig {
    pub fn dwell(&self) -> Duration {
        Duration::from_secs(self.dwell_secs).min(MAX_DWELL)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dwell_secs > MAX_DWELL.as_secs() {
            return Err(ConfigError::Message(format!(
                "notifications.dwell_secs must be at most {}, got {}",
                MAX_DWELL.as_secs(),
                self.dwell_secs
            )));
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dwell_secs: 5,
            display_enabled: true,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("notifications.dwell_secs", 5)?
            .set_default("notifications.display_enabled", true)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with KUDOS__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("KUDOS").separator("__"))

            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.notifications.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            notifications: NotificationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dwell_is_five_seconds() {
        let settings = Settings::default();
        assert_eq!(settings.notifications.dwell(), Duration::from_secs(5));
        assert!(settings.notifications.display_enabled);
    }

    #[test]
    fn test_dwell_above_maximum_is_rejected() {
        let notifications = NotificationConfig {
            dwell_secs: u64::MAX,
            display_enabled: true,
        };
        assert!(notifications.validate().is_err());
        assert_eq!(notifications.dwell(), MAX_DWELL);

        let notifications = NotificationConfig {
            dwell_secs: MAX_DWELL.as_secs(),
            display_enabled: true,
        };
        assert!(notifications.validate().is_ok());
    }

    #[test]
    fn test_builder_defaults() {
        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.notifications.dwell_secs, 5);
    }
}
