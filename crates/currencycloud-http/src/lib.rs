//! currencycloud-http - Authenticated HTTP session for the Currencycloud API.
//!
//! A [`Session`] authenticates once, attaches its token to every request,
//! re-authenticates transparently when the token expires, and can scope
//! requests to act on behalf of another contact.
//!
//! # Example
//!
//! ```no_run
//! use currencycloud_http::{Credentials, Method, Params, Session};
//!
//! # async fn example() -> currencycloud_http::Result<()> {
//! let session = Session::new()?;
//! session
//!     .authenticate("demonstration", Credentials::new("dev@example.com", "api-key"))
//!     .await?;
//!
//! let rates = session
//!     .execute(
//!         Method::GET,
//!         "/v2/rates/find",
//!         &Params::new().with("currencyPair", "GBPUSD"),
//!     )
//!     .await?;
//! println!("{}", rates);
//! # Ok(())
//! # }
//! ```

mod client;
mod delegation;
mod executor;
mod session;
mod wire;

pub use reqwest::Method;
pub use session::{Session, SessionOptions};
pub use wire::{AUTH_TOKEN_HEADER, DEFAULT_AUTH_PATH, ON_BEHALF_OF_PARAM, USER_AGENT};

pub use currencycloud_core::{
    ApiError, BaseUrl, ConfigurationError, Credentials, Environments, Error, Params, Result,
    StateError, StatusError, SubjectId, TransportError, ValidationError,
};
