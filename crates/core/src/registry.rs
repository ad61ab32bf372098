//! Namespaced registry keys.
//!
//! Item and particle identifiers on the host are namespaced strings such as
//! `minecraft:egg` or `featherlay:chicken_feed`. Keys are validated once at
//! configuration time so that the laying hot path never re-parses strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Namespace used when a key omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Namespace owned by this add-on.
pub const ADDON_NAMESPACE: &str = "featherlay";

/// Error returned when parsing an invalid [`RegistryKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryKeyError {
    input: String,
    reason: &'static str,
}

impl RegistryKeyError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

impl fmt::Display for RegistryKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid registry key '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for RegistryKeyError {}

/// A namespaced key of the form `namespace:path`.
///
/// Serialized as its `namespace:path` string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistryKey {
    namespace: String,
    path: String,
}

impl RegistryKey {
    /// Parse `namespace:path`, or a bare `path` in [`DEFAULT_NAMESPACE`].
    pub fn parse(input: &str) -> Result<Self, RegistryKeyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RegistryKeyError::new(input, "empty"));
        }

        let (namespace, path) = trimmed
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, trimmed));

        if !valid_segment(namespace, false) {
            return Err(RegistryKeyError::new(input, "bad namespace (allowed: a-z0-9_.-)"));
        }
        if !valid_segment(path, true) {
            return Err(RegistryKeyError::new(input, "bad path (allowed: a-z0-9_./-)"));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Build a key in the vanilla namespace. Panics on invalid paths, so only
    /// use it with literals.
    pub fn vanilla(path: &'static str) -> Self {
        Self::literal(DEFAULT_NAMESPACE, path)
    }

    /// Build a key in the add-on namespace. Panics on invalid paths, so only
    /// use it with literals.
    pub fn addon(path: &'static str) -> Self {
        Self::literal(ADDON_NAMESPACE, path)
    }

    fn literal(namespace: &'static str, path: &'static str) -> Self {
        assert!(valid_segment(path, true), "invalid literal key path {path}");
        Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        }
    }

    /// Registry key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registry key path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn valid_segment(segment: &str, allow_slash: bool) -> bool {
    !segment.is_empty()
        && segment.len() <= 128
        && segment.chars().all(|c| {
            matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.') || (allow_slash && c == '/')
        })
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for RegistryKey {
    type Err = RegistryKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegistryKey {
    type Error = RegistryKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistryKey> for String {
    fn from(value: RegistryKey) -> Self {
        value.to_string()
    }
}
