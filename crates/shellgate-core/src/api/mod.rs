//! HTTP gateway clients for the backend.
//!
//! - `AuthClient` logs in against the auth API and updates the session
//! - `IntegrationClient` talks to the integration API (secondary login
//!   endpoint and the dashboard)
//!
//! Both return transport failures verbatim as `ApiError`; no retries and
//! no request timeouts are configured.

pub mod client;
pub mod error;
pub mod integration;

pub use client::AuthClient;
pub use error::ApiError;
pub use integration::IntegrationClient;

/// URL of a local port nothing listens on
#[cfg(test)]
pub(crate) fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
