//! [`Settings`]-related definitions.

use std::{path::PathBuf, time::Duration};

use config::{builder::DefaultState, ConfigBuilder};
use serde::Deserialize;
use smart_default::SmartDefault;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("missing configuration value `{0}`")]
    Missing(&'static str),

    #[error("invalid configuration value `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Application configuration.
///
/// Credentials and endpoints are optional here so that each component can
/// report exactly which one it is missing when it gets built.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Settings {
    /// RapidAPI key sent with hotel search and rate requests.
    pub rapid_api_key: Option<String>,

    /// RapidAPI host header value.
    pub rapid_api_host: Option<String>,

    /// Hotel search endpoint.
    pub search_url: Option<String>,

    /// Hotel rates endpoint.
    pub rates_url: Option<String>,

    /// USD based exchange rates endpoint.
    pub exchange_rates_url: Option<String>,

    /// URL shortening endpoint, booking links are shown in full when unset.
    pub link_shortener_url: Option<String>,

    /// Mailbox the notifications are sent from, also the SMTP login.
    pub email_username: Option<String>,

    /// SMTP application password.
    pub email_app_passcode: Option<String>,

    /// SMTP server, reached over implicit TLS.
    #[default("smtp.gmail.com".to_owned())]
    pub smtp_host: String,

    #[default(465)]
    pub smtp_port: u16,

    /// Single-slot file holding the pending notification.
    #[default(PathBuf::from("saved_preferences.json"))]
    pub preferences_path: PathBuf,

    /// Timeout of every outbound HTTP request.
    #[default(Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub http_timeout: Duration,

    pub log_level: LogLevel,
}

impl Settings {
    /// Creates new [`Settings`] by:
    /// - loading them from the provided `path` (if it exists);
    /// - merging them with the environment variables, so `RAPID_API_KEY`
    ///   fills `rapid_api_key`;
    /// - using default values for missing fields.
    pub fn load(path: impl AsRef<str>) -> Result<Self, SettingsError> {
        Ok(ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()?)
    }
}

/// Returns the configured value, treating blank strings as missing.
pub fn required<'a>(
    value: &'a Option<String>,
    key: &'static str,
) -> Result<&'a str, SettingsError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(SettingsError::Missing(key))
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
