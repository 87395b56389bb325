//! The location resolution orchestrator.
//!
//! One strictly ordered fallback chain per call: device position first
//! (accuracy), IP geolocation second (coverage), reverse geocoding on
//! whichever coordinates arrived. Every failure degrades the result instead
//! of propagating, so callers can always render — worst case with an
//! entirely unknown location.

use jugaad_core::{Coordinates, LocationResult};

use crate::device::{acquire, PositionSource};
use crate::ip_lookup::IpLookupClient;
use crate::reverse::ReverseGeocoder;

/// Degraded-accuracy notice, emitted at most once per resolution run and
/// only when the device position source failed. Informational: resolution
/// continues through the IP fallback regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub message: String,
}

/// Outcome of one resolution run.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub location: LocationResult,
    pub advisory: Option<Advisory>,
}

pub struct LocationResolver<S> {
    source: S,
    ip_lookup: IpLookupClient,
    geocoder: ReverseGeocoder,
    position_timeout_ms: u64,
}

impl<S: PositionSource + Sync> LocationResolver<S> {
    pub fn new(
        source: S,
        ip_lookup: IpLookupClient,
        geocoder: ReverseGeocoder,
        position_timeout_ms: u64,
    ) -> Self {
        Self {
            source,
            ip_lookup,
            geocoder,
            position_timeout_ms,
        }
    }

    /// Runs the fallback chain to completion. Infallible: all collaborator
    /// errors are absorbed into a partial or empty [`LocationResult`].
    ///
    /// Holds no state between runs, so repeated calls against identical
    /// collaborator behavior yield equivalent results.
    pub async fn resolve(&self) -> Resolution {
        match acquire(&self.source, self.position_timeout_ms).await {
            Ok(coords) => {
                tracing::debug!(
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    "device position acquired"
                );
                Resolution {
                    location: self.geocode_or_partial(coords).await,
                    advisory: None,
                }
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "device position unavailable; falling back to IP geolocation"
                );
                let advisory = Some(Advisory {
                    message: format!(
                        "Could not access the device location ({err}); \
                         using an approximate IP-based location instead."
                    ),
                });

                match self.ip_lookup.lookup().await {
                    Ok(coords) => Resolution {
                        location: self.geocode_or_partial(coords).await,
                        advisory,
                    },
                    Err(ip_err) => {
                        tracing::warn!(
                            error = %ip_err,
                            "IP geolocation failed; location left unresolved"
                        );
                        Resolution {
                            location: LocationResult::unresolved(),
                            advisory,
                        }
                    }
                }
            }
        }
    }

    /// Reverse-geocodes known-good coordinates, keeping them even when the
    /// pincode lookup fails.
    async fn geocode_or_partial(&self, coords: Coordinates) -> LocationResult {
        match self.geocoder.reverse(coords).await {
            Ok(pincode) => {
                tracing::debug!(pincode, "reverse geocoding succeeded");
                LocationResult::resolved(pincode, coords)
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "reverse geocoding failed; returning coordinates without pincode"
                );
                LocationResult::coords_only(coords)
            }
        }
    }
}
