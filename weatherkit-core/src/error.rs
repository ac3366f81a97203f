use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of every failure the connector can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Credential,
    RequestMalformed,
    Transport,
    Decode,
    Query,
}

#[derive(Debug, Error)]
pub enum WeatherKitError {
    #[error(
        "Invalid WeatherKit configuration: missing {}.\n\
         Hint: set them in the config file (run `weatherkit configure`) or via \
         WEATHERKIT_* environment variables, or provide a static token.",
        .0.join(", ")
    )]
    MissingFields(Vec<&'static str>),

    #[error("Invalid WeatherKit host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Failed to read private key file '{0}'")]
    KeyRead(PathBuf, #[source] std::io::Error),

    #[error("Private key file '{path}' is not a PKCS#8 P-256 key: {reason}")]
    KeyParse { path: PathBuf, reason: String },

    #[error("Failed to sign authentication token: {0}")]
    Signing(String),

    #[error(
        "The request isn't authorized or doesn't include the correct authentication information [{method} {url}].\n\
         Hint: check key_id, service_id, team_id and private_key_path (or token) in the WeatherKit configuration."
    )]
    Unauthorized { method: &'static str, url: String },

    #[error(
        "The server is unable to process the request due to an invalid parameter value [{method} {url}].\n\
         This is a bug in weatherkit-core, please file an issue."
    )]
    BadRequest { method: &'static str, url: String },

    #[error("Request failed [{method} {url}]")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    HttpClientBuild(#[source] reqwest::Error),

    #[error("Response body for [{method} {url}] exceeds {limit} bytes")]
    BodyTooLarge {
        method: &'static str,
        url: String,
        limit: usize,
    },

    #[error("Could not parse response body [{method} {url}] {body}")]
    Decode {
        method: &'static str,
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing required qualifier '{0}'")]
    MissingQualifier(&'static str),

    #[error("Qualifier '{name}' must be numeric, got {value}")]
    InvalidQualifier { name: &'static str, value: String },

    #[error("Unknown table '{0}'")]
    UnknownTable(String),
}

impl WeatherKitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFields(_) | Self::InvalidHost { .. } => ErrorKind::Configuration,
            Self::KeyRead(..)
            | Self::KeyParse { .. }
            | Self::Signing(_)
            | Self::Unauthorized { .. } => ErrorKind::Credential,
            Self::BadRequest { .. } => ErrorKind::RequestMalformed,
            Self::Transport { .. } | Self::HttpClientBuild(_) | Self::BodyTooLarge { .. } => {
                ErrorKind::Transport
            }
            Self::Decode { .. } => ErrorKind::Decode,
            Self::MissingQualifier(_) | Self::InvalidQualifier { .. } | Self::UnknownTable(_) => {
                ErrorKind::Query
            }
        }
    }
}

pub type Result<T, E = WeatherKitError> = std::result::Result<T, E>;
