//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `RESTMUX_`, sections separated by `__`,
//!    e.g. `RESTMUX_DISPATCH__CORS_ENABLED=true`)
//! 2. A TOML file (`./config.toml`, or the path given to [`Config::load_from`])
//! 3. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RESTMUX_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Dispatcher behaviour
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// API key allow-list
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ServiceConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Add `Access-Control-Allow-Origin: *` to every response
    #[serde(default = "default_false")]
    pub cors_enabled: bool,

    /// Header consulted by the API key gate
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    /// Header echoed from request to response
    #[serde(default = "default_request_id_header")]
    pub request_id_header: String,

    /// Generate a request id when the client sent none
    #[serde(default = "default_false")]
    pub generate_request_id: bool,

    /// Page size used when `_perPage` is absent or invalid
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,

    /// Maximum buffered request body
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cors_enabled: default_false(),
            api_key_header: default_api_key_header(),
            request_id_header: default_request_id_header(),
            generate_request_id: default_false(),
            default_per_page: default_per_page(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

/// Static API key configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeysConfig {
    /// Reject requests whose key is not listed
    #[serde(default)]
    pub enabled: bool,

    /// Accepted keys
    #[serde(default)]
    pub keys: Vec<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_false() -> bool {
    false
}

fn default_api_key_header() -> String {
    "x-api-key".to_string()
}

fn default_request_id_header() -> String {
    "x-request-id".to_string()
}

fn default_per_page() -> usize {
    30
}

fn default_body_limit_bytes() -> usize {
    2 * 1024 * 1024
}

impl Config {
    /// Load configuration from `./config.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
        } else {
            tracing::debug!("No configuration file at {}", path.display());
        }

        let config = Self::figment(path).extract()?;
        Ok(config)
    }

    /// The layered provider, exposed for callers that merge extra sources
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "restmux".to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
            },
            dispatch: DispatchConfig::default(),
            api_keys: ApiKeysConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.dispatch.default_per_page, 30);
        assert_eq!(config.dispatch.api_key_header, "x-api-key");
        assert!(!config.dispatch.cors_enabled);
        assert!(!config.api_keys.enabled);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.service.name, "restmux");
        assert_eq!(config.service.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "notes"
port = 9000

[dispatch]
cors_enabled = true
default_per_page = 10

[api_keys]
enabled = true
keys = ["alpha", "beta"]
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "notes");
        assert_eq!(config.service.port, 9000);
        assert_eq!(config.service.log_level, "info");
        assert!(config.dispatch.cors_enabled);
        assert_eq!(config.dispatch.default_per_page, 10);
        assert_eq!(config.dispatch.request_id_header, "x-request-id");
        assert_eq!(config.api_keys.keys, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[service]
name = "notes"
port = 9000
"#,
            )?;
            jail.set_env("RESTMUX_SERVICE__PORT", "9100");
            jail.set_env("RESTMUX_DISPATCH__CORS_ENABLED", "true");

            let config: Config = Config::figment("config.toml").extract()?;
            assert_eq!(config.service.name, "notes");
            assert_eq!(config.service.port, 9100);
            assert!(config.dispatch.cors_enabled);
            Ok(())
        });
    }
}
