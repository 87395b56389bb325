//! IP-geolocation fallback, used only after the device source has failed.
//!
//! IP geolocation is coarse, so it is deliberately the last coordinate
//! source tried. The upstream service answers a plain GET with JSON of the
//! shape `{ip?, latitude?, longitude?}`; a response without both coordinates
//! counts as a failure.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use jugaad_core::Coordinates;

use crate::error::GeoError;

pub struct IpLookupClient {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    ip: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl IpLookupClient {
    /// Creates a client for the given IP-geolocation endpoint.
    ///
    /// No timeout beyond the normal per-request HTTP timeout: the device
    /// source is the only stage with its own deadline.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    /// Resolves approximate coordinates from the caller's public IP.
    ///
    /// # Errors
    ///
    /// - [`GeoError::Http`] on connection failure.
    /// - [`GeoError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeoError::MalformedResponse`] if the body is not JSON or omits
    ///   `latitude`/`longitude`.
    pub async fn lookup(&self) -> Result<Coordinates, GeoError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        let parsed: IpLookupResponse =
            serde_json::from_str(&body).map_err(|e| GeoError::MalformedResponse {
                context: self.url.clone(),
                reason: e.to_string(),
            })?;

        match (parsed.latitude, parsed.longitude) {
            (Some(latitude), Some(longitude)) => {
                tracing::debug!(
                    ip = parsed.ip.as_deref().unwrap_or("unknown"),
                    latitude,
                    longitude,
                    "resolved approximate position from IP"
                );
                Ok(Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => Err(GeoError::MalformedResponse {
                context: self.url.clone(),
                reason: "missing latitude/longitude".to_owned(),
            }),
        }
    }
}
