use std::fmt;
use std::str::FromStr;

use crate::http::response::{ResponseTemplate, UnknownTemplate};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Which listener provider the process serves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Plain TCP listener bound on `LISTEN`.
    Local,
    /// ngrok tunnel authenticated with `NGROK_AUTHTOKEN`.
    Tunnel,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ProviderKind::Local),
            "ngrok" | "tunnel" => Ok(ProviderKind::Tunnel),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Local => f.write_str("local"),
            ProviderKind::Tunnel => f.write_str("ngrok"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown PROVIDER {0:?} (expected \"local\" or \"ngrok\")")]
    UnknownProvider(String),

    #[error("invalid RESPONSE: {0}")]
    UnknownTemplate(#[from] UnknownTemplate),
}

#[derive(Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub listen_addr: String,
    pub authtoken: Option<String>,
    pub response: ResponseTemplate,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("listen_addr", &self.listen_addr)
            .field("authtoken", &self.authtoken.as_ref().map(|_| "<redacted>"))
            .field("response", &self.response)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let provider = match lookup("PROVIDER") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => ProviderKind::Local,
        };

        let listen_addr = lookup("LISTEN")
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        let authtoken = lookup("NGROK_AUTHTOKEN").filter(|token| !token.trim().is_empty());

        let response = match lookup("RESPONSE") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => ResponseTemplate::default(),
        };

        Ok(Self {
            provider,
            listen_addr,
            authtoken,
            response,
        })
    }
}
