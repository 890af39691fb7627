//! Login credentials type.

use std::fmt;

/// Login credentials for the Currencycloud authentication endpoint.
///
/// Holds the login id (usually the account email) and the API key.
/// The API key is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use currencycloud_core::Credentials;
///
/// let creds = Credentials::new("dev@example.com", "deadbeef");
/// assert_eq!(creds.login_id(), "dev@example.com");
/// ```
#[derive(Clone)]
pub struct Credentials {
    login_id: String,
    api_key: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(login_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            login_id: login_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Returns the login id.
    pub fn login_id(&self) -> &str {
        &self.login_id
    }

    /// Returns the API key.
    ///
    /// Use only when building the authentication request. Never log it.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login_id", &self.login_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
