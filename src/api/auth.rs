//! Injected auth context for the API client.
//!
//! No ambient global token: the store is constructed in `main` from
//! `--token` / `WATOP_TOKEN` and handed to `HttpApi`.

use std::sync::RwLock;

/// Bearer-token store with an explicit login/logout/token contract.
pub trait TokenStore: Send + Sync {
    /// Current token, if logged in.
    fn token(&self) -> Option<String>;

    /// Replaces the current token.
    fn login(&self, token: String);

    /// Clears the current token.
    fn logout(&self);
}

/// In-memory token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.is_empty())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn login(&self, token: String) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    fn logout(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout_cycle() {
        let store = MemoryTokenStore::new(None);
        assert_eq!(store.token(), None);

        store.login("secret".to_string());
        assert_eq!(store.token(), Some("secret".to_string()));

        store.logout();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_empty_seed_token_means_logged_out() {
        let store = MemoryTokenStore::new(Some(String::new()));
        assert_eq!(store.token(), None);
    }
}
