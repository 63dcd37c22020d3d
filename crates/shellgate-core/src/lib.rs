//! Core library for shellgate.
//!
//! This crate provides:
//! - `auth`: credentials, the session store and its storage backends
//! - `api`: gateway clients for the authentication and integration backends
//! - `login`: login form state and user-facing failure messages
//! - `config`: endpoint and storage configuration
//! - `context`: the application context tying the pieces together

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod login;

pub use context::AppContext;
