//! Process configuration, read once during startup.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::AuthenticationError;

pub const DEFAULT_PORT: u16 = 8080;

const API_KEY_VAR: &str = "OPENAI_API_KEY";
const API_KEY_FILE_VAR: &str = "OPENAI_API_KEY_FILE";
const API_BASE_VAR: &str = "OPENAI_API_BASE";
const PORT_VAR: &str = "PORT";

/// Credentials for the completion service.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    pub api_base: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn from_env() -> Result<Self, AuthenticationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves the key from `OPENAI_API_KEY`, falling back to the file named by
    /// `OPENAI_API_KEY_FILE`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthenticationError> {
        let api_key = match non_blank(lookup(API_KEY_VAR)) {
            Some(key) => key,
            None => {
                let path = non_blank(lookup(API_KEY_FILE_VAR))
                    .map(PathBuf::from)
                    .ok_or(AuthenticationError::MissingApiKey)?;
                read_key_file(path)?
            }
        };

        Ok(Self {
            api_key,
            api_base: non_blank(lookup(API_BASE_VAR)),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, AuthenticationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthenticationError> {
        let port = match lookup(PORT_VAR).map(|p| p.trim().parse::<u16>()) {
            Some(Ok(port)) => port,
            Some(Err(e)) => {
                log::warn!("Ignoring invalid {}: {}", PORT_VAR, e);
                DEFAULT_PORT
            }
            None => DEFAULT_PORT,
        };

        Ok(Self {
            credentials: Credentials::from_lookup(&lookup)?,
            port,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_key_file(path: PathBuf) -> Result<String, AuthenticationError> {
    match fs::read_to_string(&path) {
        Ok(contents) => match contents.trim() {
            "" => Err(AuthenticationError::EmptyKeyFile(path)),
            key => Ok(key.to_string()),
        },
        Err(source) => Err(AuthenticationError::KeyFile { path, source }),
    }
}
