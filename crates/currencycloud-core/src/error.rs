//! Error types for the Currencycloud client.
//!
//! Every failure reaches the caller as one of four kinds: configuration,
//! validation, session state, or a failed remote call.

use std::fmt;
use thiserror::Error;

/// The unified error type for Currencycloud operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The session could not be configured (unknown environment, bad URL).
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Caller-supplied input was malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The operation is not allowed in the session's current state.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// A remote call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl Error {
    /// Returns the wrapped API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The environment name has no entry in the environment table.
    #[error("invalid environment '{name}'")]
    UnknownEnvironment { name: String },

    /// The base URL is malformed or uses a disallowed scheme.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {message}")]
    HttpClient { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A delegation subject id is not a UUID.
    #[error("id '{value}' is not a valid UUID")]
    SubjectId { value: String },

    /// Request parameters did not serialize to a JSON object.
    #[error("invalid request parameters: {message}")]
    Params { message: String },
}

/// Session state errors.
#[derive(Debug, Error)]
pub enum StateError {
    /// A delegation scope is already active on this session.
    #[error("onBehalfOf has already been called and not yet completed")]
    AlreadyScoped,

    /// No configuration has been stored; call `authenticate` first.
    #[error("session is not authenticated")]
    NotAuthenticated,
}

/// Transport-level failures (no HTTP response was received).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Any other HTTP client failure.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// A failure surfaced from a remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with a non-success status.
    #[error("{0}")]
    Status(StatusError),

    /// The response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Returns the HTTP status code, if the service responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status(err) => Some(err.status),
            _ => None,
        }
    }

    /// True when the service rejected the request with HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<StatusError> for ApiError {
    fn from(err: StatusError) -> Self {
        ApiError::Status(err)
    }
}

/// A non-success HTTP response from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    /// HTTP status code.
    pub status: u16,
    /// Service error code (e.g. `auth_failed`), if the body carried one.
    pub code: Option<String>,
    /// Flattened `field: message` entries from the body.
    pub messages: Vec<String>,
}

impl StatusError {
    pub fn new(status: u16, code: Option<String>, messages: Vec<String>) -> Self {
        Self {
            status,
            code,
            messages,
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if !self.messages.is_empty() {
            write!(f, ": {}", self.messages.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for StatusError {}
