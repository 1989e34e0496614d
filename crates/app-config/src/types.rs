// In crates/app-config/src/types.rs

use analytics::EngineSettings;
use core_types::{Granularity, Locale};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// `host:port`, ready for a TCP listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Tunables of the metrics engine.
    #[serde(default)]
    pub metrics: EngineSettings,
    #[serde(default)]
    pub report: ReportSettings,
    pub server: ServerSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

/// Defaults for views that do not name a granularity or locale.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ReportSettings {
    #[serde(default)]
    pub default_granularity: Granularity,
    #[serde(default)]
    pub default_locale: Locale,
}
