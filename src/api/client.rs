use super::settle::SettlePolicy;
use crate::{auth::AuthCredentials, config::Config, error::Result};
use std::time::Duration;
use url::Url;

/// The REST API version we speak unless told otherwise.
pub const DEFAULT_API_VERSION: &str = "2.5";

/// The pause between connection records when building a workbook inventory.
pub const DEFAULT_CONNECTION_PACING: Duration = Duration::from_millis(250);

/// An unauthenticated client for a single Tableau Server.
///
/// Nothing site-specific can be done with this alone: call `sign_in` to
/// obtain a `Session`.
#[derive(Debug, Clone)]
pub struct TableauClient {
    /// Shared connection pool across all requests.
    pub(crate) http: reqwest::Client,
    /// `{server_url}/api/{version}`, without a trailing slash.
    base_url: String,
    pub(crate) credentials: AuthCredentials,
    pub(crate) settle_policy: SettlePolicy,
    pub(crate) connection_pacing: Duration,
}

impl TableauClient {
    /// Creates a new client for the given server, using the default API version.
    pub fn new(server_url: &str, credentials: AuthCredentials) -> Result<Self> {
        Self::with_api_version(server_url, DEFAULT_API_VERSION, credentials)
    }

    pub fn with_api_version(
        server_url: &str,
        api_version: &str,
        credentials: AuthCredentials,
    ) -> Result<Self> {
        let server_url = Url::parse(server_url)?;
        let base_url = format!(
            "{server}/api/{api_version}",
            server = server_url.as_str().trim_end_matches('/')
        );

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
            settle_policy: SettlePolicy::default(),
            connection_pacing: DEFAULT_CONNECTION_PACING,
        })
    }

    /// Builds a client from a loaded configuration file.
    /// The password falls back to the OS keyring when the file has none.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client =
            Self::with_api_version(&config.server_url, &config.api_version, config.credentials()?)?;
        if let Some(seconds) = config.settle_seconds {
            client.settle_policy = SettlePolicy::from_secs_f64(seconds)?;
        }
        if let Some(millis) = config.pacing_millis {
            client.connection_pacing = Duration::from_millis(millis);
        }
        Ok(client)
    }

    pub fn with_settle_policy(mut self, settle_policy: SettlePolicy) -> Self {
        self.settle_policy = settle_policy;
        self
    }

    pub fn with_connection_pacing(mut self, pacing: Duration) -> Self {
        self.connection_pacing = pacing;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn settle_policy(&self) -> SettlePolicy {
        self.settle_policy
    }

    /// The absolute URL for an API route such as `/sites`.
    pub(crate) fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}
