//! The `config` module handles loading and merging client configuration
//! from a file and environment variables on top of built-in defaults.

mod settings;

use config::{Config, ConfigError, Environment, File};

use crate::config::settings::PartialSettings;

pub use settings::{ClientSettings, ConnectionSettings, Settings};

/// Loads the configuration from the default file and environment variables
/// and merges it with default values.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::with_prefix("PUBWIRE").separator("_"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        connection: ConnectionSettings {
            url: partial
                .connection
                .as_ref()
                .and_then(|c| c.url.clone())
                .unwrap_or(default.connection.url),
            timeout_secs: partial
                .connection
                .as_ref()
                .and_then(|c| c.timeout_secs)
                .unwrap_or(default.connection.timeout_secs),
        },
        client: ClientSettings {
            default_qos: partial
                .client
                .as_ref()
                .and_then(|c| c.default_qos)
                .unwrap_or(default.client.default_qos),
            log_level: partial
                .client
                .as_ref()
                .and_then(|c| c.log_level.clone())
                .unwrap_or(default.client.log_level),
        },
    })
}
