use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Username/password pair sent to the login endpoint.
///
/// Created per submission attempt and dropped once the request resolves.
#[derive(Clone, Serialize, Validate)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Credentials {
    #[validate(email(message = "Please enter a valid email"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Per-field validation messages for display next to the form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check the shape constraints, returning one message per failing field
    pub fn field_errors(&self) -> FieldErrors {
        let errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        FieldErrors {
            username: field_message(&errors, "username", &self.username, "Email is required"),
            password: field_message(&errors, "password", &self.password, "Password is required"),
        }
    }
}

/// Pick the message to show for a field. An empty value reports `required`
/// instead of the shape error.
fn field_message(
    errors: &ValidationErrors,
    field: &str,
    value: &str,
    required: &str,
) -> Option<String> {
    if value.is_empty() {
        return Some(required.to_string());
    }
    let field_errors = errors.field_errors();
    let list = field_errors.get(field)?;
    list.first().map(|e| match e.message {
        Some(ref message) => message.to_string(),
        None => format!("Invalid {}", field),
    })
}

// Keep the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Successful response body of the auth login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}
