//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `REFSEARCH_*` environment variables; the
//! vendor API keys (`ANTHROPIC_API_KEY`, `OPENAI_API_KEY`, `GEMINI_API_KEY`) decide which
//! providers are configured.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_DEMO_RESULTS, DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_RESULTS_LIMIT};
use crate::provider::ProviderKind;

/// Default model per vendor.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-7-sonnet-latest";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `REFSEARCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Reference dataset (JSON array). `None` loads the bundled sample dataset.
    pub data_path: Option<PathBuf>,

    /// Provider used when a request does not name one. Default: `anthropic`.
    pub default_provider: ProviderKind,

    pub anthropic_model: String,
    pub openai_model: String,
    pub gemini_model: String,

    /// Upper bound on a single provider call. Default: 30s.
    pub provider_timeout: Duration,

    /// Maximum results returned after refinement. Default: `5`.
    pub results_limit: usize,

    /// Number of synthetic results in demo mode. Default: `5`.
    pub demo_results: usize,

    /// Providers whose vendor key is present, in priority order.
    pub configured: Vec<ProviderKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            data_path: None,
            default_provider: ProviderKind::Anthropic,
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            provider_timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
            results_limit: DEFAULT_RESULTS_LIMIT,
            demo_results: DEFAULT_DEMO_RESULTS,
            configured: Vec::new(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "REFSEARCH_PORT";
    const ENV_BIND_ADDR: &'static str = "REFSEARCH_BIND_ADDR";
    const ENV_DATA_PATH: &'static str = "REFSEARCH_DATA_PATH";
    const ENV_DEFAULT_PROVIDER: &'static str = "REFSEARCH_DEFAULT_PROVIDER";
    const ENV_ANTHROPIC_MODEL: &'static str = "REFSEARCH_ANTHROPIC_MODEL";
    const ENV_OPENAI_MODEL: &'static str = "REFSEARCH_OPENAI_MODEL";
    const ENV_GEMINI_MODEL: &'static str = "REFSEARCH_GEMINI_MODEL";
    const ENV_PROVIDER_TIMEOUT_MS: &'static str = "REFSEARCH_PROVIDER_TIMEOUT_MS";
    const ENV_RESULTS_LIMIT: &'static str = "REFSEARCH_RESULTS_LIMIT";
    const ENV_DEMO_RESULTS: &'static str = "REFSEARCH_DEMO_RESULTS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let data_path = Self::parse_optional_path_from_env(Self::ENV_DATA_PATH);
        let default_provider = Self::parse_provider_from_env(defaults.default_provider)?;
        let anthropic_model =
            Self::parse_string_from_env(Self::ENV_ANTHROPIC_MODEL, defaults.anthropic_model);
        let openai_model = Self::parse_string_from_env(Self::ENV_OPENAI_MODEL, defaults.openai_model);
        let gemini_model = Self::parse_string_from_env(Self::ENV_GEMINI_MODEL, defaults.gemini_model);
        let timeout_ms = Self::parse_u64_from_env(
            Self::ENV_PROVIDER_TIMEOUT_MS,
            defaults.provider_timeout.as_millis() as u64,
        )?;
        let results_limit =
            Self::parse_u64_from_env(Self::ENV_RESULTS_LIMIT, defaults.results_limit as u64)?;
        let demo_results =
            Self::parse_u64_from_env(Self::ENV_DEMO_RESULTS, defaults.demo_results as u64)?;

        Ok(Self {
            port,
            bind_addr,
            data_path,
            default_provider,
            anthropic_model,
            openai_model,
            gemini_model,
            provider_timeout: Duration::from_millis(timeout_ms),
            results_limit: results_limit as usize,
            demo_results: demo_results as usize,
            configured: Self::detect_configured_providers(),
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.data_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if self.provider_timeout.is_zero() {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_PROVIDER_TIMEOUT_MS,
            });
        }
        if self.results_limit == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_RESULTS_LIMIT,
            });
        }
        if self.demo_results == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_DEMO_RESULTS,
            });
        }

        for kind in ProviderKind::PRIORITY {
            if self.model_for(kind).trim().is_empty() {
                return Err(ConfigError::BlankValue {
                    name: match kind {
                        ProviderKind::Anthropic => Self::ENV_ANTHROPIC_MODEL,
                        ProviderKind::OpenAi => Self::ENV_OPENAI_MODEL,
                        ProviderKind::Gemini => Self::ENV_GEMINI_MODEL,
                    },
                });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn model_for(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::Anthropic => &self.anthropic_model,
            ProviderKind::OpenAi => &self.openai_model,
            ProviderKind::Gemini => &self.gemini_model,
        }
    }

    pub fn configured_providers(&self) -> &[ProviderKind] {
        &self.configured
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.configured.contains(&kind)
    }

    fn detect_configured_providers() -> Vec<ProviderKind> {
        ProviderKind::PRIORITY
            .into_iter()
            .filter(|kind| {
                env::var(kind.api_key_env()).is_ok_and(|key| !key.trim().is_empty())
            })
            .collect()
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_provider_from_env(default: ProviderKind) -> Result<ProviderKind, ConfigError> {
        match env::var(Self::ENV_DEFAULT_PROVIDER) {
            Ok(value) if !value.trim().is_empty() => {
                value.parse().map_err(|_| ConfigError::InvalidProvider {
                    name: Self::ENV_DEFAULT_PROVIDER,
                    value,
                })
            }
            _ => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }
}
