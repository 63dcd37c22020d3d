//! Authentication module for managing credentials and the session token.
//!
//! This module provides:
//! - `Credentials`: the username/password pair submitted on login
//! - `SessionStore`: the authoritative current token, with change listeners
//! - `TokenStorage`: pluggable persistence for the token
//!
//! Tokens carry no expiry metadata; presence alone means authenticated.

pub mod credentials;
pub mod session;
pub mod storage;

pub use credentials::{AuthResponse, Credentials, FieldErrors};
pub use session::{SessionStore, SubscriptionId, TokenChange, TOKEN_KEY};
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, NoopStorage, TokenStorage};
