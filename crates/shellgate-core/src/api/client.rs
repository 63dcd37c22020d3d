//! Client for the authentication API.
//!
//! `AuthClient` owns the `SessionStore`: a successful login replaces the
//! session token, a failed one leaves it untouched.

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::auth::{AuthResponse, Credentials, SessionStore};

use super::ApiError;

/// Path of the login endpoint, relative to the auth API base URL
const LOGIN_PATH: &str = "/auth/login";

pub struct AuthClient {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl AuthClient {
    /// Create a new auth client with its own connection pool
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, ApiError> {
        let client = Client::builder().build().map_err(ApiError::ClientBuild)?;
        Ok(Self::with_client(client, base_url, session))
    }

    /// Create an auth client sharing an existing connection pool
    pub fn with_client(client: Client, base_url: &str, session: SessionStore) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }

    /// POST the credentials to the login endpoint and adopt the returned token.
    ///
    /// Failures are returned unchanged and leave the session as it was.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = self.login_url();
        debug!(url = %url, username = %credentials.username, "Sending login request");

        let result = async {
            let response = self
                .client
                .post(&url)
                .header(header::CONTENT_TYPE, "application/json")
                .json(credentials)
                .send()
                .await?;
            let response = check_response(response).await?;
            read_json::<AuthResponse>(response).await
        }
        .await;

        match result {
            Ok(auth) => {
                self.session.set_token(auth.access_token.clone());
                info!("Login successful");
                Ok(auth)
            }
            Err(e) => {
                if e.is_network() {
                    error!(error = %e, "Login request got no response; backend unreachable?");
                } else {
                    error!(error = %e, "Login failed");
                }
                Err(e)
            }
        }
    }

    /// Forget the current session
    pub fn logout(&mut self) {
        self.session.clear();
        info!("Logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.current_token()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }
}

/// Check if response is successful, returning an error with body if not.
pub(crate) async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }
}

/// Read a successful response body as JSON
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response body: {}", e)))?;
    serde_json::from_str(&text)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
}
