//! HTTP client for the Jugaad backend REST endpoints.
//!
//! Wraps `reqwest` with typed request/response payloads and endpoint-aware
//! error context. Use [`BackendClient::new`] against the configured backend,
//! which is also how tests point it at a wiremock server.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::types::{
    AlertRequest, DeleteItemRequest, ItemDetail, ItemQuery, ItemsQuery, MealPlan, SignupRequest,
    TrackedItem,
};

#[derive(Debug)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    /// Creates a client against the given backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: exactly one trailing slash so `join` appends to the
        // root path instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the signed-in user's tracked items for their delivery area.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on connection failure.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ApiError::Deserialize`] if the payload does not match
    ///   [`TrackedItem`].
    pub async fn get_items(&self, query: &ItemsQuery) -> Result<Vec<TrackedItem>, ApiError> {
        self.post_json("get-items", query).await
    }

    /// Fetches full detail (current price, history, store info) for one item.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::get_items`].
    pub async fn get_item(&self, query: &ItemQuery) -> Result<ItemDetail, ApiError> {
        self.post_json("get-item", query).await
    }

    /// Creates a price alert.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on connection failure.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx response.
    pub async fn add_item(&self, alert: &AlertRequest) -> Result<(), ApiError> {
        self.post_ack("add-items", alert).await
    }

    /// Deletes a tracked item.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::add_item`].
    pub async fn delete_item(&self, request: &DeleteItemRequest) -> Result<(), ApiError> {
        self.post_ack("delete-item", request).await
    }

    /// Registers the signed-in user with the backend.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::add_item`].
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        self.post_ack("signup", request).await
    }

    /// Asks the recipe assistant for a meal plan with shoppable items.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on connection failure.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ApiError::Deserialize`] if the payload does not match
    ///   [`MealPlan`].
    pub async fn plan(&self, query: &str) -> Result<MealPlan, ApiError> {
        let mut url = self.join("chat/stream-plan")?;
        url.query_pairs_mut().append_pair("query", query);
        let url_display = url.to_string();

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url_display,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: "chat/stream-plan".to_owned(),
            source: e,
        })
    }

    /// POSTs `body` as JSON and parses the JSON response.
    async fn post_json<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.join(endpoint)?;
        let url_display = url.to_string();

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url_display,
            });
        }

        // Read the body first so parse failures carry the endpoint context.
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialize {
            context: endpoint.to_owned(),
            source: e,
        })
    }

    /// POSTs `body` as JSON; only the status matters, the response body is
    /// ignored.
    async fn post_ack<B>(&self, endpoint: &'static str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + Sync,
    {
        let url = self.join(endpoint)?;
        let url_display = url.to_string();

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url_display,
            });
        }
        Ok(())
    }

    fn join(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}
