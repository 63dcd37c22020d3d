//! Application context: owns the session and both gateway clients.
//!
//! Built once by the entry point and passed where needed.

use anyhow::Result;
use reqwest::Client;
use tracing::debug;

use crate::api::{AuthClient, IntegrationClient};
use crate::auth::{SessionStore, TokenStorage};
use crate::config::Config;
use crate::login::LoginForm;

pub struct AppContext {
    pub auth: AuthClient,
    pub integration: IntegrationClient,
    pub login_form: LoginForm,
}

impl AppContext {
    /// Build the context from config, using the configured token storage
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_storage(config, config.token_storage()?)
    }

    /// Build the context with an explicit storage backend. The stored
    /// token, if any, is restored before returning.
    pub fn with_storage(config: &Config, storage: Box<dyn TokenStorage>) -> Result<Self> {
        let mut session = SessionStore::new(storage);
        let restored = session.initialize();
        debug!(restored, "Session initialized");

        // One connection pool for both backends
        let client = Client::builder().build()?;

        Ok(Self {
            auth: AuthClient::with_client(client.clone(), &config.api_url, session),
            integration: IntegrationClient::with_client(client, &config.integration_url),
            login_form: LoginForm::new(),
        })
    }

    pub fn session(&self) -> &SessionStore {
        self.auth.session()
    }
}
