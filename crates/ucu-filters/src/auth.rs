//! Bearer token supply for the options service.
//!
//! Tokens are opaque. Issuing and refreshing them belongs to the sign-in
//! flow; this side only reads whatever is current.

use std::sync::Arc;

/// Supplies the bearer token attached to each options request.
pub trait TokenProvider: Send + Sync {
    /// The current token, or `None` when the user is signed out.
    fn token(&self) -> Option<String>;
}

impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

/// A fixed token, e.g. from a CLI flag or environment variable.
#[derive(Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self::from_option(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }

    /// Blank tokens count as absent.
    pub fn from_option(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }

    /// Read the token from environment variable `var`.
    pub fn from_env(var: &str) -> Self {
        Self::from_option(std::env::var(var).ok())
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.0.is_some() { "[REDACTED]" } else { "None" };
        f.debug_tuple("StaticToken").field(&shown).finish()
    }
}
