//! Client for the integration API (secondary login endpoint and dashboard).
//!
//! Responses are returned as raw JSON; nothing here touches the session.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::auth::Credentials;

use super::client::{check_response, read_json};
use super::ApiError;

/// Cheap to clone; shares the connection pool.
#[derive(Clone)]
pub struct IntegrationClient {
    client: Client,
    base_url: String,
}

impl IntegrationClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder().build().map_err(ApiError::ClientBuild)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST credentials to `{base}/login` and return the raw response body
    pub async fn do_login(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        let url = format!("{}/login", self.base_url);
        debug!(url = %url, "Sending integration login request");

        let response = self.client.post(&url).json(credentials).send().await?;
        let response = check_response(response).await?;
        read_json(response).await
    }

    /// GET `{base}/dashboard` and return the raw response body
    pub async fn fetch_dashboard(&self) -> Result<Value, ApiError> {
        let url = format!("{}/dashboard", self.base_url);
        debug!(url = %url, "Fetching dashboard");

        let response = self.client.get(&url).send().await?;
        let response = check_response(response).await?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::closed_port_url;

    #[tokio::test]
    async fn test_fetch_dashboard_returns_raw_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"widgets": [1, 2, 3], "title": "Home"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = IntegrationClient::new(&server.uri()).unwrap();

        let dashboard = client.fetch_dashboard().await.unwrap();
        assert_eq!(dashboard["title"], "Home");
        assert_eq!(dashboard["widgets"].as_array().map(|w| w.len()), Some(3));

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_dashboard_propagates_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({})))
            .mount(&server)
            .await;
        let client = IntegrationClient::new(&server.uri()).unwrap();

        let err = client.fetch_dashboard().await.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_fetch_dashboard_connection_refused() {
        let client = IntegrationClient::new(&closed_port_url()).unwrap();
        assert!(client.fetch_dashboard().await.unwrap_err().is_network());
    }

    #[tokio::test]
    async fn test_do_login_posts_to_login_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(header("content-type", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"accessToken": "t", "user": "a@b.com"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = IntegrationClient::new(&format!("{}/", server.uri())).unwrap();

        let resp = client
            .do_login(&Credentials::new("a@b.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(resp["user"], "a@b.com");
    }
}
