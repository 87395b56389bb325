use crate::location::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the Jugaad backend (reverse geocoding plus all item and
    /// alert endpoints).
    pub backend_base_url: String,
    /// IP geolocation service queried when the device position is
    /// unavailable.
    pub ip_lookup_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// How long to wait for the device position source before falling back.
    pub geolocation_timeout_ms: u64,
    /// Optional pinned device position; `None` forces the IP fallback path.
    pub device_position: Option<Coordinates>,
}
