//! Best-effort location resolution for the Jugaad client.
//!
//! Composes a device position source (with timeout), an IP-geolocation
//! fallback, and the backend reverse-geocode endpoint into a single
//! [`LocationResolver::resolve`] call that always yields a usable
//! (possibly partial, possibly empty) [`jugaad_core::LocationResult`].

pub mod device;
pub mod error;
pub mod ip_lookup;
pub mod resolver;
pub mod reverse;

pub use device::{acquire, ConfiguredPosition, PositionSource};
pub use error::{GeoError, PositionError};
pub use ip_lookup::IpLookupClient;
pub use resolver::{Advisory, LocationResolver, Resolution};
pub use reverse::ReverseGeocoder;
