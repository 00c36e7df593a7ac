//! API key gate
//!
//! The gate sees the raw value of the configured key header (or `None`) and
//! decides whether the request may reach a handler at all. Rejected requests
//! are answered with 403 before handler resolution.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::config::ApiKeysConfig;

/// Boolean admission check on the API key header
pub trait ApiKeyGate: Send + Sync {
    /// Whether a request carrying `key` may proceed
    fn allow(&self, key: Option<&str>) -> bool;
}

impl<F> ApiKeyGate for F
where
    F: Fn(Option<&str>) -> bool + Send + Sync,
{
    fn allow(&self, key: Option<&str>) -> bool {
        self(key)
    }
}

/// Admits every request
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl ApiKeyGate for AllowAll {
    fn allow(&self, _key: Option<&str>) -> bool {
        true
    }
}

/// Admits requests whose key is in a fixed allow-list
///
/// # Example
///
/// ```rust
/// use restmux::dispatch::{ApiKeyGate, StaticKeys};
///
/// let gate = StaticKeys::new(["alpha", "beta"]);
/// assert!(gate.allow(Some("alpha")));
/// assert!(!gate.allow(Some("gamma")));
/// assert!(!gate.allow(None));
/// ```
#[derive(Clone, Default)]
pub struct StaticKeys {
    keys: HashSet<String>,
}

impl StaticKeys {
    /// Allow exactly `keys`
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Gate described by configuration: [`AllowAll`] when disabled
    pub fn from_config(config: &ApiKeysConfig) -> Arc<dyn ApiKeyGate> {
        if !config.enabled {
            return Arc::new(AllowAll);
        }
        if config.keys.is_empty() {
            tracing::warn!("API key gate enabled without keys; every request will be rejected");
        }
        Arc::new(Self::new(config.keys.iter().cloned()))
    }

    /// Number of accepted keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key is accepted
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl ApiKeyGate for StaticKeys {
    fn allow(&self, key: Option<&str>) -> bool {
        key.is_some_and(|k| self.keys.contains(k.trim()))
    }
}

impl fmt::Debug for StaticKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticKeys")
            .field("keys", &format_args!("[{} redacted]", self.keys.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_gate() {
        let gate = |key: Option<&str>| key == Some("let-me-in");
        assert!(gate.allow(Some("let-me-in")));
        assert!(!gate.allow(Some("nope")));
        assert!(!gate.allow(None));
    }

    #[test]
    fn test_allow_all() {
        assert!(AllowAll.allow(None));
        assert!(AllowAll.allow(Some("")));
    }

    #[test]
    fn test_static_keys_trim_header_value() {
        let gate = StaticKeys::new(vec!["k1".to_string()]);
        assert!(gate.allow(Some(" k1 ")));
        assert!(!gate.allow(Some("K1")));
        assert_eq!(gate.len(), 1);
    }

    #[test]
    fn test_from_config() {
        let disabled = StaticKeys::from_config(&ApiKeysConfig::default());
        assert!(disabled.allow(None));

        let enabled = StaticKeys::from_config(&ApiKeysConfig {
            enabled: true,
            keys: vec!["secret".into()],
        });
        assert!(enabled.allow(Some("secret")));
        assert!(!enabled.allow(None));

        let empty = StaticKeys::from_config(&ApiKeysConfig {
            enabled: true,
            keys: vec![],
        });
        assert!(!empty.allow(Some("anything")));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let rendered = format!("{:?}", StaticKeys::new(["hunter2"]));
        assert!(!rendered.contains("hunter2"));
    }
}
