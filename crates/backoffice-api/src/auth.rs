use std::fmt;

use dashmap::DashMap;
use secrecy::SecretString;

/// Key under which the bearer token lives in a [`CredentialStore`].
pub const AUTH_TOKEN_KEY: &str = "token";

/// Source of the bearer credential attached to outgoing requests.
///
/// Consulted once per request, never cached by the transport, so a token
/// rotated or removed by the auth layer takes effect on the next call.
/// Returning `None` sends the request unauthenticated.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<SecretString>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<SecretString> + Send + Sync,
{
    fn bearer_token(&self) -> Option<SecretString> {
        self()
    }
}

/// Provider that never supplies a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn bearer_token(&self) -> Option<SecretString> {
        None
    }
}

/// Process-wide key/value credential store.
///
/// The auth layer writes the session token under [`AUTH_TOKEN_KEY`]; the
/// transport reads it back through the [`CredentialProvider`] impl.
/// Share it as `Arc<CredentialStore>`.
#[derive(Default)]
pub struct CredentialStore {
    entries: DashMap<String, SecretString>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<SecretString>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<SecretString> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    pub fn remove(&self, key: &str) -> Option<SecretString> {
        self.entries.remove(key).map(|(_, v)| v)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Store the session token under the well-known key.
    pub fn set_token(&self, token: impl Into<SecretString>) {
        self.set(AUTH_TOKEN_KEY, token);
    }

    /// Drop the session token (logout).
    pub fn clear_token(&self) {
        self.remove(AUTH_TOKEN_KEY);
    }
}

impl CredentialProvider for CredentialStore {
    fn bearer_token(&self) -> Option<SecretString> {
        self.get(AUTH_TOKEN_KEY)
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("keys", &self.entries.len())
            .finish_non_exhaustive()
    }
}
