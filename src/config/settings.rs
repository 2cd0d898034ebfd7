use serde::Deserialize;

/// Top-level configuration settings for the client.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub client: ClientSettings,
}

/// Where and how to reach the service.
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectionSettings {
    pub url: String,
    /// Upper bound, in seconds, for every blocking operation.
    pub timeout_secs: u64,
}

/// Operational defaults for client calls.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    /// QoS used for ordinary publishes (administrative requests always use 1).
    pub default_qos: u8,
    pub log_level: String,
}

/// Partial configuration loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub connection: Option<PartialConnectionSettings>,
    pub client: Option<PartialClientSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialConnectionSettings {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialClientSettings {
    pub default_qos: Option<u8>,
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings {
                url: "ws://127.0.0.1:8080".to_string(),
                timeout_secs: 60,
            },
            client: ClientSettings {
                default_qos: 0,
                log_level: "info".to_string(),
            },
        }
    }
}
