// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded from the environment once at startup. Everything in
//! here is read-only after `main` has built it.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HS256 signing secret (at least 32 bytes) | Random per process |
//! | `TOKEN_TTL_SECS` | Bearer token lifetime in seconds | `86400` |
//! | `SEED_DEMO_DATA` | Create the `demo` account with sample spendings | off |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS with `TLS_KEY_PATH`) | unset |
//! | `TLS_KEY_PATH` | PEM private key | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::Duration;
use rand::Rng;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the token signing secret.
///
/// When unset a random secret is generated, which means every restart
/// invalidates all outstanding tokens.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";
pub const SEED_DEMO_DATA_ENV: &str = "SEED_DEMO_DATA";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Default token lifetime (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Shortest accepted signing secret. HS256 keys below the hash size are weak.
pub const MIN_SECRET_LEN: usize = 32;

/// Default tracing filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("JWT_SECRET must be at least 32 bytes (got {0})")]
    SecretTooShort(usize),

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
}

/// Token signing secret. Never printed.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Fresh random secret for processes started without `JWT_SECRET`.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; 64];
        rand::rng().fill(&mut bytes[..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Process-wide configuration, built once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: SigningSecret,
    /// `true` when the secret was generated because `JWT_SECRET` was unset.
    pub secret_generated: bool,
    pub token_ttl: Duration,
    pub seed_demo_data: bool,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host.parse().map_err(|_| ConfigError::Invalid {
            var: HOST_ENV,
            expected: "IP address",
            value: host.clone(),
        })?;

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                expected: "port number",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let (jwt_secret, secret_generated) = match lookup(JWT_SECRET_ENV) {
            Some(raw) if raw.len() < MIN_SECRET_LEN => {
                return Err(ConfigError::SecretTooShort(raw.len()));
            }
            Some(raw) => (SigningSecret::new(raw.into_bytes()), false),
            None => (SigningSecret::generate(), true),
        };

        let token_ttl = match lookup(TOKEN_TTL_ENV) {
            Some(raw) => match raw.parse::<i64>().ok().filter(|secs| *secs > 0) {
                Some(secs) => Duration::try_seconds(secs).ok_or_else(|| ConfigError::Invalid {
                    var: TOKEN_TTL_ENV,
                    expected: "positive number of seconds",
                    value: raw.clone(),
                })?,
                None => {
                    return Err(ConfigError::Invalid {
                        var: TOKEN_TTL_ENV,
                        expected: "positive number of seconds",
                        value: raw,
                    })
                }
            },
            None => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        };

        let seed_demo_data = lookup(SEED_DEMO_DATA_ENV)
            .map(|raw| is_truthy(&raw))
            .unwrap_or(false);

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            jwt_secret,
            secret_generated,
            token_ttl,
            seed_demo_data,
            tls,
            log_format,
        })
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(config.secret_generated);
        assert_eq!(config.jwt_secret.as_bytes().len(), 64);
        assert_eq!(config.token_ttl, Duration::hours(24));
        assert!(!config.seed_demo_data);
        assert!(config.tls.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn explicit_values_are_used() {
        let secret = "s".repeat(40);
        let config = load(&[
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "3000"),
            (JWT_SECRET_ENV, &secret),
            (TOKEN_TTL_ENV, "600"),
            (SEED_DEMO_DATA_ENV, "TRUE"),
            (LOG_FORMAT_ENV, "json"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert!(!config.secret_generated);
        assert_eq!(config.jwt_secret.as_bytes(), secret.as_bytes());
        assert_eq!(config.token_ttl, Duration::minutes(10));
        assert!(config.seed_demo_data);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = load(&[(JWT_SECRET_ENV, "too-short")]).unwrap_err();
        assert_eq!(err, ConfigError::SecretTooShort(9));
    }

    #[test]
    fn invalid_port_and_ttl_are_rejected() {
        assert!(matches!(
            load(&[(PORT_ENV, "eighty")]),
            Err(ConfigError::Invalid { var: PORT_ENV, .. })
        ));
        assert!(matches!(
            load(&[(TOKEN_TTL_ENV, "0")]),
            Err(ConfigError::Invalid { var: TOKEN_TTL_ENV, .. })
        ));
    }

    #[test]
    fn tls_requires_both_paths() {
        assert_eq!(
            load(&[(TLS_CERT_PATH_ENV, "/tls/cert.pem")]).unwrap_err(),
            ConfigError::IncompleteTls
        );

        let config = load(&[
            (TLS_CERT_PATH_ENV, "/tls/cert.pem"),
            (TLS_KEY_PATH_ENV, "/tls/key.pem"),
        ])
        .unwrap();
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: "/tls/cert.pem".into(),
                key: "/tls/key.pem".into(),
            })
        );
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = SigningSecret::new("super-secret-value-that-is-long-enough");
        assert_eq!(format!("{secret:?}"), "SigningSecret(<redacted>)");
    }
}
