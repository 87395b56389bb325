use crate::app_config::{AppConfig, Environment};
use crate::location::Coordinates;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, raw: &str| -> Result<f64, ConfigError> {
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let backend_base_url = require("JUGAAD_BACKEND_URL")?;

    let env = parse_environment(&or_default("JUGAAD_ENV", "development"));
    let log_level = or_default("JUGAAD_LOG_LEVEL", "info");
    let ip_lookup_url = or_default("JUGAAD_IP_LOOKUP_URL", "https://ipapi.co/json/");
    let request_timeout_secs = parse_u64("JUGAAD_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("JUGAAD_USER_AGENT", "jugaad/0.1 (price-alerts)");
    let geolocation_timeout_ms = parse_u64("JUGAAD_GEO_TIMEOUT_MS", "10000")?;

    // A pinned device position needs both coordinates; one without the other
    // is a configuration mistake, not a partial position.
    let device_position = match (lookup("JUGAAD_DEVICE_LAT").ok(), lookup("JUGAAD_DEVICE_LON").ok())
    {
        (Some(lat), Some(lon)) => Some(Coordinates {
            latitude: parse_f64("JUGAAD_DEVICE_LAT", &lat)?,
            longitude: parse_f64("JUGAAD_DEVICE_LON", &lon)?,
        }),
        (None, None) => None,
        _ => {
            return Err(ConfigError::Validation(
                "JUGAAD_DEVICE_LAT and JUGAAD_DEVICE_LON must be set together".to_string(),
            ))
        }
    };

    Ok(AppConfig {
        env,
        log_level,
        backend_base_url,
        ip_lookup_url,
        request_timeout_secs,
        user_agent,
        geolocation_timeout_ms,
        device_position,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
