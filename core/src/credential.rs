//! Read-only credential lookup.
//!
//! The gateway asks a `CredentialStore` for the value under `TOKEN_KEY`
//! before every request. Stores are never written through this crate.

use std::collections::HashMap;

use cookie::Cookie;

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "token";

/// Keyed, read-only lookup into client-side persisted storage.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// The bearer token, if one is stored and non-empty.
    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }
}

/// A store that never holds anything. Requests go out unauthenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialStore for NoCredentials {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

/// A single fixed token, returned for `TOKEN_KEY` only.
#[derive(Debug, Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialStore for StaticCredential {
    fn get(&self, key: &str) -> Option<String> {
        (key == TOKEN_KEY).then(|| self.0.clone())
    }
}

/// In-memory key/value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Cookies parsed from a `Cookie:` header value (`a=1; token=abc`).
///
/// Names and values are percent-decoded, and one pair of surrounding double
/// quotes is stripped from each value, so `token=%22a%2Bb%22` reads as
/// `a+b`. Malformed pairs are skipped. When a name repeats, the first
/// occurrence wins, matching browser ordering.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    cookies: Vec<(String, String)>,
}

impl CookieStore {
    pub fn parse(header: &str) -> Self {
        let cookies = Cookie::split_parse_encoded(header)
            .filter_map(Result::ok)
            .map(|c| (c.name().to_string(), c.value_trimmed().to_string()))
            .collect();
        Self { cookies }
    }
}

impl CredentialStore for CookieStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cookies
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    }
}
