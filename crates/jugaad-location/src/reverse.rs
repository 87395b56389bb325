//! Reverse-geocoding client for the backend `/reverse` endpoint.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use jugaad_core::{is_valid_pincode, Coordinates};

use crate::error::GeoError;

/// Converts coordinates into a delivery pincode via the backend.
///
/// A pure function of its inputs: no retries (the resolver decides what a
/// failure means) and no state between calls.
pub struct ReverseGeocoder {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    pincode: Option<String>,
}

impl ReverseGeocoder {
    /// Creates a geocoder against the given backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`GeoError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: exactly one trailing slash so `join` appends to the root
        // path instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeoError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Resolves `coords` to a pincode via `GET {base}/reverse?lat=&lon=`.
    ///
    /// # Errors
    ///
    /// - [`GeoError::Http`] on connection failure.
    /// - [`GeoError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeoError::MalformedResponse`] if the payload is not JSON, lacks
    ///   the `pincode` field, or carries a pincode that is not a valid
    ///   six-digit postal code.
    pub async fn reverse(&self, coords: Coordinates) -> Result<String, GeoError> {
        let mut url = self
            .base_url
            .join("reverse")
            .map_err(|e| GeoError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("lat", &coords.latitude.to_string())
            .append_pair("lon", &coords.longitude.to_string());
        let url_display = url.to_string();

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::UnexpectedStatus {
                status: status.as_u16(),
                url: url_display,
            });
        }

        let body = response.text().await?;
        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeoError::MalformedResponse {
                context: url_display.clone(),
                reason: e.to_string(),
            })?;

        match parsed.pincode {
            Some(pincode) if is_valid_pincode(&pincode) => Ok(pincode),
            Some(pincode) => Err(GeoError::MalformedResponse {
                context: url_display,
                reason: format!("invalid pincode {pincode:?}"),
            }),
            None => Err(GeoError::MalformedResponse {
                context: url_display,
                reason: "missing pincode".to_owned(),
            }),
        }
    }
}
