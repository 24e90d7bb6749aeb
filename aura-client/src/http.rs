//! HTTP client for network-based API calls

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Thin wrapper around `reqwest` that knows the base URL and credentials
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    api_key: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build a request with bearer token and API key attached
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.client.request(method, self.url(path));

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        request
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request; 404 maps to `None`
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        let response = self.request(Method::GET, path).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::handle_response(response).await.map(Some)
    }

    /// Make a PUT request with JSON body, discarding the response body
    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Make a POST request with JSON body and hand back the raw response
    ///
    /// Used where the caller needs the status and body of failures.
    pub async fn post_raw<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<Response> {
        Ok(self.request(Method::POST, path).json(body).send().await?)
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(Into::into)
    }

    async fn check_status(response: Response) -> ClientResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        let text = crate::error::provider_message(&body).unwrap_or(body);
        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(text),
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST => ClientError::Validation(text),
            _ => ClientError::Internal(format!("{status}: {text}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = HttpClient::new(&ClientConfig::new("https://store.example.com/v1/")).unwrap();

        assert_eq!(
            client.url("/documents/system/catalog_manifest"),
            "https://store.example.com/v1/documents/system/catalog_manifest"
        );
        assert_eq!(client.url("models"), "https://store.example.com/v1/models");
    }

    #[test]
    fn test_api_key_is_sent_as_query_parameter() {
        let config = ClientConfig::new("https://api.example.com/v1beta").with_api_key("k-123");
        let client = HttpClient::new(&config).unwrap();
        let request = client.request(Method::GET, "models").build().unwrap();

        assert_eq!(request.url().query(), Some("key=k-123"));
    }

    #[test]
    fn test_token_is_sent_as_bearer() {
        let config = ClientConfig::new("https://store.example.com").with_token("t-1");
        let client = HttpClient::new(&config).unwrap();
        let request = client.request(Method::GET, "documents/a/b").build().unwrap();

        assert_eq!(
            request
                .headers()
                .get(reqwest::header::AUTHORIZATION)
                .unwrap()
                .to_str()
                .unwrap(),
            "Bearer t-1"
        );
    }
}
