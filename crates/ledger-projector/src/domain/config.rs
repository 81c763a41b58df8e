//! # Configuration
//!
//! Explicit configuration for the projection layer. Hosts either embed
//! [`ProjectorConfig`] in their own config file (every section has serde
//! defaults) or build it from the environment.

use std::collections::HashSet;
use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main projector configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Target network prefixes, one per address class
    pub prefixes: AddressPrefixes,
    /// Identity service used to resolve validator avatars
    pub avatar: AvatarConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl ProjectorConfig {
    /// Build from defaults overlaid with environment variables.
    ///
    /// - `PROJECTOR_ACCOUNT_PREFIX`
    /// - `PROJECTOR_VALOPER_PREFIX`
    /// - `PROJECTOR_VALCONS_PREFIX`
    /// - `PROJECTOR_AVATAR_ENDPOINT`
    /// - `PROJECTOR_AVATAR_TIMEOUT_SECS`
    /// - `PROJECTOR_LOG_LEVEL` or `RUST_LOG`
    /// - `PROJECTOR_JSON_LOGS`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            prefixes: AddressPrefixes {
                account: env::var("PROJECTOR_ACCOUNT_PREFIX")
                    .unwrap_or(defaults.prefixes.account),
                validator_operator: env::var("PROJECTOR_VALOPER_PREFIX")
                    .unwrap_or(defaults.prefixes.validator_operator),
                validator_consensus: env::var("PROJECTOR_VALCONS_PREFIX")
                    .unwrap_or(defaults.prefixes.validator_consensus),
            },
            avatar: AvatarConfig {
                endpoint: env::var("PROJECTOR_AVATAR_ENDPOINT")
                    .unwrap_or(defaults.avatar.endpoint),
                timeout: env::var("PROJECTOR_AVATAR_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.avatar.timeout),
            },
            logging: LoggingConfig::from_env(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefixes = [
            ("account", &self.prefixes.account),
            ("validator_operator", &self.prefixes.validator_operator),
            ("validator_consensus", &self.prefixes.validator_consensus),
        ];

        for (class, prefix) in prefixes {
            if prefix.is_empty() {
                return Err(ConfigError::EmptyPrefix(class));
            }
            // bech32 human-readable part: printable ASCII, lowercase here
            let valid = prefix
                .bytes()
                .all(|b| (33..=126).contains(&b) && !b.is_ascii_uppercase());
            if !valid || prefix.len() > 83 {
                return Err(ConfigError::InvalidPrefix {
                    class,
                    prefix: prefix.to_string(),
                });
            }
        }

        let unique: HashSet<_> = prefixes.iter().map(|(_, prefix)| prefix).collect();
        if unique.len() != prefixes.len() {
            return Err(ConfigError::DuplicatePrefixes);
        }

        if self.avatar.endpoint.is_empty() {
            return Err(ConfigError::InvalidAvatar(
                "endpoint cannot be empty".into(),
            ));
        }
        if self.avatar.timeout.is_zero() {
            return Err(ConfigError::InvalidAvatar("timeout cannot be 0".into()));
        }

        Ok(())
    }
}

/// Target network prefixes for each address class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressPrefixes {
    /// Accounts, delegators, proposers, voters
    pub account: String,
    /// Validator operator addresses
    pub validator_operator: String,
    /// Validator consensus addresses
    pub validator_consensus: String,
}

impl Default for AddressPrefixes {
    fn default() -> Self {
        Self {
            account: "like".to_string(),
            validator_operator: "likevaloper".to_string(),
            validator_consensus: "likevalcons".to_string(),
        }
    }
}

/// Identity service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Base URL of the keybase API
    pub endpoint: String,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://keybase.io/_/api/1.0".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive (trace, debug, info, warn, error, or per-target)
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: env::var("PROJECTOR_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json: env::var("PROJECTOR_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} prefix cannot be empty")]
    EmptyPrefix(&'static str),

    #[error("{class} prefix {prefix:?} is not a lowercase bech32 prefix")]
    InvalidPrefix { class: &'static str, prefix: String },

    #[error("address classes must use distinct prefixes")]
    DuplicatePrefixes,

    #[error("invalid avatar configuration: {0}")]
    InvalidAvatar(String),
}
