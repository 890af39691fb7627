//! currencycloud-core - Core types for the Currencycloud API client.
//!
//! Everything here is transport-free: the error taxonomy, credentials and
//! token types, the environment table, delegation subject ids, and the
//! parameter shaping applied to every outgoing request.

pub mod credentials;
pub mod error;
pub mod params;
pub mod token;
pub mod types;

pub use credentials::Credentials;
pub use error::{
    ApiError, ConfigurationError, Error, StateError, StatusError, TransportError, ValidationError,
};
pub use params::Params;
pub use token::AuthToken;
pub use types::{BaseUrl, Environments, SubjectId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
