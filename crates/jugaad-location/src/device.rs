//! Device position acquisition with an explicit timeout guard.

use std::future::Future;
use std::time::Duration;

use jugaad_core::Coordinates;

use crate::error::PositionError;

/// A source of the device's current position.
///
/// Abstracts the platform geolocation API so the resolver can be driven by a
/// real device integration, a pinned position from configuration, or a fake
/// in tests. Passed explicitly rather than reached for through ambient
/// globals.
pub trait PositionSource {
    fn current_position(&self)
        -> impl Future<Output = Result<Coordinates, PositionError>> + Send;
}

/// Waits for the source's position, giving up after `timeout_ms`.
///
/// Built on `tokio::time::timeout`, which drops both the timer and the
/// pending position future as soon as either side settles: a timeout that
/// has lost the race can never fire late and overwrite a delivered position.
///
/// # Errors
///
/// - [`PositionError::Timeout`] if the source does not respond in time.
/// - Any error the source itself reports (`PermissionDenied`,
///   `PositionUnavailable`).
pub async fn acquire<S>(source: &S, timeout_ms: u64) -> Result<Coordinates, PositionError>
where
    S: PositionSource + Sync,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), source.current_position()).await
    {
        Ok(result) => result,
        Err(_) => Err(PositionError::Timeout { timeout_ms }),
    }
}

/// Position source backed by configuration: either a pinned coordinate pair
/// or nothing at all, in which case the resolver proceeds straight to the IP
/// fallback.
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredPosition {
    Pinned(Coordinates),
    Unavailable,
}

impl From<Option<Coordinates>> for ConfiguredPosition {
    fn from(coords: Option<Coordinates>) -> Self {
        match coords {
            Some(c) => ConfiguredPosition::Pinned(c),
            None => ConfiguredPosition::Unavailable,
        }
    }
}

impl PositionSource for ConfiguredPosition {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, PositionError>> + Send {
        let outcome = match self {
            ConfiguredPosition::Pinned(coords) => Ok(*coords),
            ConfiguredPosition::Unavailable => Err(PositionError::PositionUnavailable),
        };
        async move { outcome }
    }
}

#[cfg(test)]
#[path = "device_test.rs"]
mod tests;
