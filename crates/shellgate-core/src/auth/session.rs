use tracing::{debug, warn};

use super::storage::TokenStorage;

/// Storage key holding the raw token string
pub const TOKEN_KEY: &str = "token";

/// Notification delivered to listeners after every `set_token` / `clear`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenChange {
    pub was_authenticated: bool,
    pub is_authenticated: bool,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&TokenChange) + Send>;

/// Owns the current session token and keeps it in sync with storage.
///
/// Writes go to storage first, then memory, then listeners are notified.
/// A failed storage write is logged and the in-memory state still changes.
pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    token: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl SessionStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            storage,
            token: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Adopt a previously persisted token, if any. The token is not
    /// validated against the server and listeners are not notified.
    pub fn initialize(&mut self) -> bool {
        match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => {
                debug!("Restored session token from storage");
                self.token = Some(token);
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session token");
                false
            }
        }
    }

    /// Replace the current token
    pub fn set_token(&mut self, token: String) {
        if let Err(e) = self.storage.set(TOKEN_KEY, &token) {
            warn!(error = %e, "Failed to persist session token");
        }
        let was_authenticated = self.is_authenticated();
        self.token = Some(token);
        self.notify(was_authenticated);
    }

    /// Drop the current token from memory and storage
    pub fn clear(&mut self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!(error = %e, "Failed to remove persisted session token");
        }
        let was_authenticated = self.is_authenticated();
        self.token = None;
        self.notify(was_authenticated);
    }

    pub fn current_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// A non-empty token counts; there is no expiry check
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TokenChange) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, was_authenticated: bool) {
        let change = TokenChange {
            was_authenticated,
            is_authenticated: self.is_authenticated(),
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}
