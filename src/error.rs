use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Possible error types while talking to Tableau Server.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-2xx status.
    #[error("{method} {route} failed with {status}: {body}")]
    Http {
        method: String,
        route: String,
        status: StatusCode,
        body: String,
    },

    #[error("request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("unable to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The sign-in token cannot be carried in a header.
    #[error("server issued a token that is not a valid header value")]
    InvalidToken,

    #[error("group {0} does not exist")]
    GroupNotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential storage error: {0}")]
    CredentialStorage(#[from] keyring::Error),
}

impl Error {
    /// Whether the server rejected a creation because the resource already exists.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    /// The HTTP status for server-side failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::Reqwest(error) => error.status(),
            _ => None,
        }
    }
}
