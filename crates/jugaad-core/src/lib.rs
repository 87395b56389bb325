pub mod app_config;
pub mod config;
pub mod error;
pub mod identity;
pub mod location;
pub mod pincode;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use identity::Identity;
pub use location::{Coordinates, LocationResult};
pub use pincode::is_valid_pincode;
