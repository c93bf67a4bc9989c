//! Store configuration read from the environment.
//!
//! Two values configure the store:
//!
//! - `TASKSYNC_STORE_URL`: the store endpoint (required at first use)
//! - `TASKSYNC_STORE_KEY`: the access key (optional, empty if absent)

use std::env;

pub const STORE_URL_VAR: &str = "TASKSYNC_STORE_URL";
pub const STORE_KEY_VAR: &str = "TASKSYNC_STORE_KEY";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    endpoint: Option<String>,
    access_key: String,
}

impl StoreConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            access_key: String::new(),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// Never fails: a missing endpoint is only reported when the store is first
    /// used (see [`StoreConfig::connection_url`]).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup(STORE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let access_key = lookup(STORE_KEY_VAR).unwrap_or_default();
        Self { endpoint, access_key }
    }

    pub fn with_access_key(mut self, key: impl Into<String>) -> Self {
        self.access_key = key.into();
        self
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The URL to connect with, or `None` if no endpoint is configured.
    ///
    /// A non-empty access key is spliced in as the password when the URL names
    /// a user without one (`postgres://app@host/db` becomes
    /// `postgres://app:<key>@host/db`). Any other URL is returned unchanged.
    pub fn connection_url(&self) -> Option<String> {
        let endpoint = self.endpoint.as_deref()?;
        if self.access_key.is_empty() {
            return Some(endpoint.to_string());
        }
        let Some((scheme, rest)) = endpoint.split_once("://") else {
            return Some(endpoint.to_string());
        };
        let authority_end = rest.find('/').unwrap_or(rest.len());
        let Some(at) = rest[..authority_end].rfind('@') else {
            return Some(endpoint.to_string());
        };
        let user = &rest[..at];
        if user.is_empty() || user.contains(':') {
            return Some(endpoint.to_string());
        }
        Some(format!(
            "{scheme}://{user}:{key}{tail}",
            key = self.access_key,
            tail = &rest[at..]
        ))
    }
}
