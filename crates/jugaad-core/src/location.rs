use serde::{Deserialize, Serialize};

/// A latitude/longitude pair produced by one position source during a single
/// resolution attempt. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The best-effort output of a location resolution run.
///
/// Invariant: a `Some` pincode was derived from a successful reverse-geocode
/// call on valid coordinates. A fully-`None` value means total resolution
/// failure and must be treated by consumers as "unknown", not as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub pincode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LocationResult {
    /// Both a pincode and the coordinates it was derived from.
    #[must_use]
    pub fn resolved(pincode: String, coords: Coordinates) -> Self {
        Self {
            pincode: Some(pincode),
            latitude: Some(coords.latitude),
            longitude: Some(coords.longitude),
        }
    }

    /// Coordinates known, pincode not (reverse geocoding failed).
    #[must_use]
    pub fn coords_only(coords: Coordinates) -> Self {
        Self {
            pincode: None,
            latitude: Some(coords.latitude),
            longitude: Some(coords.longitude),
        }
    }

    /// Every fallback exhausted.
    #[must_use]
    pub fn unresolved() -> Self {
        Self {
            pincode: None,
            latitude: None,
            longitude: None,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_pincode(&self) -> bool {
        self.pincode.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_carries_pincode_and_coords() {
        let coords = Coordinates {
            latitude: 9.93,
            longitude: 76.26,
        };
        let result = LocationResult::resolved("682020".to_owned(), coords);
        assert_eq!(result.pincode.as_deref(), Some("682020"));
        assert_eq!(result.coordinates(), Some(coords));
    }

    #[test]
    fn coords_only_has_no_pincode() {
        let result = LocationResult::coords_only(Coordinates {
            latitude: 12.9,
            longitude: 77.6,
        });
        assert!(!result.has_pincode());
        assert!(result.coordinates().is_some());
    }

    #[test]
    fn unresolved_is_fully_null() {
        let result = LocationResult::unresolved();
        assert_eq!(
            result,
            LocationResult {
                pincode: None,
                latitude: None,
                longitude: None,
            }
        );
        assert!(result.coordinates().is_none());
    }
}
