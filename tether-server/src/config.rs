//! Relay configuration.
//!
//! Loaded from environment variables; every setting has a default so the
//! relay starts with an empty environment.

use std::collections::HashMap;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address (all interfaces).
pub const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listening port, from `PORT`.
    pub port: u16,

    /// Interface to bind, from `BIND_HOST`.
    pub bind_host: IpAddr,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_host: DEFAULT_BIND_HOST,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = match vars.get("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: value.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let bind_host = match vars.get("BIND_HOST") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "BIND_HOST",
                value: value.clone(),
            })?,
            None => DEFAULT_BIND_HOST,
        };

        Ok(Self { port, bind_host })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port)
    }
}
