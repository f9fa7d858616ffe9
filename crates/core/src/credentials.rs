//! Static API-key credentials.
//!
//! The service is called by a single integration that presents a fixed key.
//! [`CredentialSet`] is built once at startup and shared read-only through
//! application state; there is no process-wide mutable token map.

use subtle::ConstantTimeEq;

/// Identity bound to a key when none is configured explicitly.
pub const DEFAULT_API_USER: &str = "appuser";

/// The caller identity a valid key resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

/// Immutable mapping from API key to identity.
#[derive(Clone, Default)]
pub struct CredentialSet {
    entries: Vec<(String, Identity)>,
}

impl CredentialSet {
    /// A credential set holding exactly one key.
    ///
    /// An empty key is ignored, so the resulting set authenticates nothing.
    pub fn single(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self::default().with_token(token, username)
    }

    /// Add another key, returning the extended set.
    pub fn with_token(mut self, token: impl Into<String>, username: impl Into<String>) -> Self {
        let token = token.into();
        if !token.is_empty() {
            self.entries.push((
                token,
                Identity {
                    username: username.into(),
                },
            ));
        }
        self
    }

    /// Resolve a presented key to its identity.
    ///
    /// Every configured key is compared in constant time so the response
    /// timing does not reveal how much of a key matched.
    pub fn verify(&self, presented: &str) -> Option<&Identity> {
        let presented = presented.as_bytes();
        let mut found = None;
        for (token, identity) in &self.entries {
            if bool::from(token.as_bytes().ct_eq(presented)) && found.is_none() {
                found = Some(identity);
            }
        }
        found
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys never reach logs.
        f.debug_struct("CredentialSet")
            .field("keys", &self.entries.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
