use crate::{
    api::DEFAULT_API_VERSION,
    auth::{self, AuthCredentials},
    error::{Error, Result},
};
use serde::Deserialize;
use std::{fs, path::Path};

/// The format of our JSON configuration file.
///
/// ```json
/// {
///     "server_url": "https://tableau.example.com",
///     "username": "admin",
///     "password": "optional, otherwise read from the keyring"
/// }
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Overrides the pause after writes. `0` disables it.
    #[serde(default)]
    pub settle_seconds: Option<f64>,
    /// Overrides the pause between inventory records.
    #[serde(default)]
    pub pacing_millis: Option<u64>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|error| {
            Error::Config(format!("unable to read {}: {error}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(contents)
            .map_err(|error| Error::Config(error.to_string()))?;
        if config.server_url.is_empty() || config.username.is_empty() {
            return Err(Error::Config(
                "server_url and username must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Credentials from the file, falling back to the keyring for the password.
    pub fn credentials(&self) -> Result<AuthCredentials> {
        let password = match &self.password {
            Some(password) => password.clone(),
            None => auth::stored_password(&self.server_url, &self.username)?,
        };
        Ok(AuthCredentials::new(self.username.clone(), password))
    }
}
