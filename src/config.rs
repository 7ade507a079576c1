use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to open config file")]
    Unreadable(#[source] std::io::Error),
    #[error("Bad config file")]
    BadFormat { lines: usize },
}

/// Garmin Connect login, read from a two line config file:
/// the username first, the password second.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(ConfigError::Unreadable)?;
        Self::parse(&String::from_utf8_lossy(&bytes))
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let lines: Vec<&str> = contents.lines().map(str::trim).collect();

        match lines.as_slice() {
            [username, password] => Ok(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(ConfigError::BadFormat { lines: lines.len() }),
        }
    }
}

/// The config file lives next to the installed binary.
pub fn default_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let dir = exe
        .parent()
        .context("Executable path has no parent directory")?;
    Ok(dir.join(CONFIG_FILE_NAME))
}
