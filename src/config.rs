//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SALESBOARD_BACK_CONFIG_PATH";
/// Environment variable holding the token signing secret.
const JWT_SECRET_ENV: &str = "JWT_SECRET";
/// Development fallback used when [`JWT_SECRET_ENV`] is absent.
const DEV_JWT_SECRET: &str = "supersecret";

/// How long a takeover notification stays on screen when the push omits a
/// duration.
const DEFAULT_NOTIFICATION_DURATION_MS: u64 = 15_000;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    notification_duration_ms: u64,
    booking_slots: Vec<String>,
    jwt_secret: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in
    /// defaults, and pick up the token secret from the environment.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        slots = config.booking_slots.len(),
                        "loaded configuration from file"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        match env::var(JWT_SECRET_ENV) {
            Ok(secret) if !secret.is_empty() => config.jwt_secret = secret,
            _ => {
                warn!("JWT_SECRET not set; using the development fallback secret");
            }
        }

        config
    }

    /// Fallback display duration for notifications pushed without one.
    pub fn notification_duration_ms(&self) -> u64 {
        self.notification_duration_ms
    }

    /// The fixed, bookable slot labels.
    pub fn booking_slots(&self) -> &[String] {
        &self.booking_slots
    }

    /// Whether `slot` is one of the bookable labels.
    pub fn is_bookable_slot(&self, slot: &str) -> bool {
        self.booking_slots.iter().any(|known| known == slot)
    }

    /// Secret used to sign and verify bearer tokens.
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notification_duration_ms: DEFAULT_NOTIFICATION_DURATION_MS,
            booking_slots: default_booking_slots(),
            jwt_secret: DEV_JWT_SECRET.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    notification_duration_ms: Option<u64>,
    booking_slots: Option<Vec<String>>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            notification_duration_ms: value
                .notification_duration_ms
                .unwrap_or(defaults.notification_duration_ms),
            booking_slots: value
                .booking_slots
                .filter(|slots| !slots.is_empty())
                .unwrap_or(defaults.booking_slots),
            jwt_secret: defaults.jwt_secret,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Hourly conference slots from 10:30 AM to 7:30 PM.
fn default_booking_slots() -> Vec<String> {
    [
        "10:30 AM - 11:30 AM",
        "11:30 AM - 12:30 PM",
        "12:30 PM - 01:30 PM",
        "01:30 PM - 02:30 PM",
        "02:30 PM - 03:30 PM",
        "03:30 PM - 04:30 PM",
        "04:30 PM - 05:30 PM",
        "05:30 PM - 06:30 PM",
        "06:30 PM - 07:30 PM",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_nine_slots() {
        let config = AppConfig::default();
        assert_eq!(config.booking_slots().len(), 9);
        assert!(config.is_bookable_slot("10:30 AM - 11:30 AM"));
        assert!(!config.is_bookable_slot("08:30 AM - 09:30 AM"));
        assert_eq!(config.notification_duration_ms(), 15_000);
    }

    #[test]
    fn raw_config_keeps_defaults_for_absent_fields() {
        let raw: RawConfig = serde_json::from_str(r#"{"notificationDurationMs": 5000}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.notification_duration_ms(), 5000);
        assert_eq!(config.booking_slots().len(), 9);
    }
}
