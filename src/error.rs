use std::path::PathBuf;

/// Fatal conditions that end a run.
///
/// HTTP failures are not listed here: the bootstrap and registration phases
/// log them and report a plain success flag, which the orchestrator turns into
/// [`AuthError::ApiConfigUnavailable`] or [`AuthError::RegistrationFailed`].
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("operation cancelled by user")]
    Cancelled,

    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    #[error("'{url}' is not a valid base URL")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("could not remove existing '{}'", path.display())]
    RemoveCredentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read '{}'", path.display())]
    ReadCredentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse '{}'", path.display())]
    ParseCredentials {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to obtain '{}'", path.display())]
    CredentialsMissing { path: PathBuf },

    #[error("Spotizerr has no Spotify API credentials configured")]
    ApiConfigUnavailable,

    #[error("failed to register the account with Spotizerr")]
    RegistrationFailed,

    #[error("Spotify Connect responder failed: {0}")]
    Responder(String),

    #[error("could not read from the terminal")]
    Prompt(#[source] std::io::Error),
}

impl AuthError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AuthError::Cancelled)
    }
}

impl From<dialoguer::Error> for AuthError {
    fn from(err: dialoguer::Error) -> Self {
        let dialoguer::Error::IO(io) = err;
        if io.kind() == std::io::ErrorKind::Interrupted {
            AuthError::Cancelled
        } else {
            AuthError::Prompt(io)
        }
    }
}
