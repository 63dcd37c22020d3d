//! Login form state and user-facing failure messages.
//!
//! `LoginForm` validates credentials locally, hands valid ones to the
//! `AuthClient`, and turns the outcome into a message for display.

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{ApiError, AuthClient};
use crate::auth::{AuthResponse, Credentials, FieldErrors};

/// Number of token characters shown in the success message
const TOKEN_PREVIEW_CHARS: usize = 20;

/// Why a submission failed, as shown to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginFailure {
    #[error("Please fill in all required fields correctly.")]
    Validation(FieldErrors),

    #[error("Cannot connect to server. Please check if backend is running.")]
    Connection,

    #[error("Invalid credentials. Please check your email and password.")]
    Authentication,

    #[error("Login failed: {0}")]
    Unknown(String),
}

impl From<&ApiError> for LoginFailure {
    fn from(err: &ApiError) -> Self {
        if err.is_network() {
            return LoginFailure::Connection;
        }
        if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            return LoginFailure::Authentication;
        }
        let description = err.to_string();
        if description.trim().is_empty() {
            LoginFailure::Unknown("Unknown error".to_string())
        } else {
            LoginFailure::Unknown(description)
        }
    }
}

/// Displayable state of the login form
#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    loading: bool,
    error: Option<String>,
    success: Option<String>,
    field_errors: FieldErrors,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and submit credentials.
    ///
    /// Invalid credentials never reach the network.
    pub async fn submit(
        &mut self,
        auth: &mut AuthClient,
        credentials: &Credentials,
    ) -> Result<AuthResponse, LoginFailure> {
        self.field_errors = credentials.field_errors();
        if !self.field_errors.is_empty() {
            debug!(field_errors = ?self.field_errors, "Login form has invalid fields");
            let failure = LoginFailure::Validation(self.field_errors.clone());
            self.error = Some(failure.to_string());
            return Err(failure);
        }

        self.loading = true;
        self.error = None;
        self.success = None;

        let result = auth.login(credentials).await;
        self.loading = false;

        match result {
            Ok(response) => {
                self.success = Some(success_message(&response.access_token));
                Ok(response)
            }
            Err(e) => {
                let failure = LoginFailure::from(&e);
                warn!(error = %e, message = %failure, "Login submission failed");
                self.error = Some(failure.to_string());
                Err(failure)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Per-field messages from the last submission attempt
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }
}

fn success_message(token: &str) -> String {
    let preview: String = token.chars().take(TOKEN_PREVIEW_CHARS).collect();
    format!("Login successful! Token received: {}...", preview)
}
