//! Error types and the mapping from HTTP responses to them.

use std::fmt;

use hyper::body::Bytes;
use hyper::{Body, Response};
use serde::{Deserialize, Serialize};

use crate::models::StatusWrapper;
use crate::resolve::EntityKind;
use crate::version::{ServerVersion, Version};

/// Result alias used by every operation in this crate.
pub type ConnectResult<T> = Result<T, Error>;

/// Error body returned by the Connect API for any non-success status.
///
/// Two values are equal iff both status and message match, so callers can
/// compare against an expected failure directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectAPIError {
    /// HTTP status code reported by the server.
    pub status: u16,
    /// Human-readable message reported by the server.
    pub message: String,
}

impl ConnectAPIError {
    /// Builds an error from a status and message.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConnectAPIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}: {}", self.status, self.message)
    }
}

impl From<StatusWrapper> for ConnectAPIError {
    fn from(val: StatusWrapper) -> Self {
        let status = val.status;
        ConnectAPIError::new(status, String::from(val))
    }
}

/// Everything that can go wrong talking to a Connect server.
#[derive(Debug)]
pub enum Error {
    /// A required identifier was empty; no request was sent.
    MissingIdentifier(&'static str),
    /// The HTTP exchange itself failed (connectivity, TLS, reading the body).
    Transport(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// The server answered with a non-success status.
    ConnectAPI(ConnectAPIError),
    /// The version header was present but not a `major.minor.patch` triple.
    MalformedVersion(String),
    /// The server is older than the operation requires.
    VersionTooLow {
        /// What the server reported, or the floor estimate.
        server: ServerVersion,
        /// What the operation requires.
        minimum: Version,
    },
    /// No entity carries the requested title.
    NotFound {
        /// Kind of entity searched for.
        kind: EntityKind,
        /// Title searched for.
        title: String,
    },
    /// More than one entity carries the requested title.
    AmbiguousTitle {
        /// Kind of entity searched for.
        kind: EntityKind,
        /// Title searched for.
        title: String,
        /// Number of entities sharing the title.
        count: usize,
    },
    /// A request or response body could not be (de)serialized.
    Serde(serde_json::Error),
    /// A request could not be built.
    Http(hyper::http::Error),
    /// An item failed local validation before being sent.
    InvalidItem(String),
    /// Client configuration is missing or unusable.
    Config(String),
    /// A location the server handed out points away from the configured host.
    ForeignLocation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingIdentifier(what) => write!(f, "no {} provided", what),
            Error::Transport(err) => write!(f, "transport error: {}", err),
            Error::ConnectAPI(err) => write!(f, "Connect API error, {}", err),
            Error::MalformedVersion(raw) => write!(f, "malformed server version {:?}", raw),
            Error::VersionTooLow { server, minimum } => write!(
                f,
                "server version {} is lower than the required {}",
                server, minimum
            ),
            Error::NotFound { kind, title } => {
                write!(f, "no {} found with title {:?}", kind, title)
            }
            Error::AmbiguousTitle { kind, title, count } => write!(
                f,
                "found {} {}s with title {:?}, expected exactly one",
                count, kind, title
            ),
            Error::Serde(err) => write!(f, "serialization error: {}", err),
            Error::Http(err) => write!(f, "invalid request: {}", err),
            Error::InvalidItem(reason) => write!(f, "invalid item: {}", reason),
            Error::Config(reason) => write!(f, "configuration error: {}", reason),
            Error::ForeignLocation(location) => {
                write!(f, "refusing to send credentials to {}", location)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(err) => Some(err.as_ref()),
            Error::Serde(err) => Some(err),
            Error::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConnectAPIError> for Error {
    fn from(err: ConnectAPIError) -> Self {
        Error::ConnectAPI(err)
    }
}

impl From<hyper::Error> for Error {
    fn from(err: hyper::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<hyper::http::Error> for Error {
    fn from(err: hyper::http::Error) -> Self {
        Error::Http(err)
    }
}

/// Splits a response into its body on success, or the error it describes.
///
/// A non-success body is decoded as `{status, message}`; when that fails the
/// error carries the response status and a generic message.
pub(crate) async fn classify(response: Response<Body>) -> ConnectResult<Bytes> {
    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(Error::ConnectAPI(api_error_from_body(status.as_u16(), &body)))
    }
}

pub(crate) fn api_error_from_body(status: u16, body: &[u8]) -> ConnectAPIError {
    serde_json::from_slice::<ConnectAPIError>(body)
        .unwrap_or_else(|_| StatusWrapper { status }.into())
}
