//! REST client for network-based API calls

use std::sync::{Arc, Mutex};

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Header carrying the project API key on every request.
const API_KEY_HEADER: &str = "apikey";

/// REST client for making network requests to the backend hub.
///
/// The access token is shared behind a handle so that signing in through
/// [`crate::AuthClient`] upgrades every clone of this client at once.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
    token: Arc<Mutex<Option<String>>>,
}

impl RestClient {
    /// Create a new REST client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            token: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the project API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Set the access token used for authenticated requests
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.lock().unwrap() = Some(token.into());
    }

    /// Clear the access token, falling back to anonymous access
    pub fn clear_token(&self) {
        *self.token.lock().unwrap() = None;
    }

    /// Get the current access token, if signed in
    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    /// Build authorization header value. Anonymous requests carry the
    /// project key as the bearer so row-level policies still apply.
    fn auth_header(&self) -> String {
        match self.token() {
            Some(token) => format!("Bearer {}", token),
            None => format!("Bearer {}", self.api_key),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn apply_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
    }

    /// Make a GET request with query parameters
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> ClientResult<T> {
        let request = self.client.get(self.url(path)).query(params);
        let response = self.apply_headers(request).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.apply_headers(request).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request that asks the server to echo the stored rows
    pub async fn post_returning<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self
            .client
            .post(self.url(path))
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.apply_headers(request).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request that asks the server to echo the updated rows
    pub async fn patch_returning<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        params: &[(String, String)],
        body: &B,
    ) -> ClientResult<T> {
        let request = self
            .client
            .patch(self.url(path))
            .query(params)
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.apply_headers(request).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without body, ignoring the response body
    pub async fn post_no_content(&self, path: &str) -> ClientResult<()> {
        let request = self.client.post(self.url(path));
        let response = self.apply_headers(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::status_error(status, text));
        }

        Ok(())
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::status_error(status, text));
        }

        response.json().await.map_err(Into::into)
    }

    fn status_error(status: StatusCode, text: String) -> ClientError {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(text),
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST => ClientError::Validation(text),
            _ => ClientError::Internal(text),
        }
    }
}
