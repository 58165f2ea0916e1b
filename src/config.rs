//! Process configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `PORT` | `8080` | listen port on `0.0.0.0` |
//! | `UPLOAD_DIR` | `uploads` | where uploads are written and downloads read |
//! | `JWT_SECRET` | `secret` | HS256 key for `/login` tokens |
//! | `AUTH_TOKEN` | `valid-token` | bearer token accepted under `/protected` |

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::middleware::DEFAULT_TOKEN;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_JWT_SECRET: &str = "secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got `{0}`")]
    InvalidPort(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
    pub auth_token: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            jwt_secret: DEFAULT_JWT_SECRET.to_owned(),
            auth_token: DEFAULT_TOKEN.to_owned(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset keys take their default;
    /// an empty `PORT` counts as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            if dir.is_empty() {
                return Err(ConfigError::Empty("UPLOAD_DIR"));
            }
            config.upload_dir = PathBuf::from(dir);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            if secret.is_empty() {
                return Err(ConfigError::Empty("JWT_SECRET"));
            }
            config.jwt_secret = secret;
        }
        if let Some(token) = lookup("AUTH_TOKEN") {
            if token.is_empty() {
                return Err(ConfigError::Empty("AUTH_TOKEN"));
            }
            config.auth_token = token;
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// True while the demo signing key is still in use.
    pub fn uses_demo_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
