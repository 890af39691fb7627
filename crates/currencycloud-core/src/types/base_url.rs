//! API base URL type.

use std::fmt;
use url::Url;

use crate::error::{ConfigurationError, Error};

/// A validated API base URL.
///
/// Must be HTTPS, or HTTP for localhost so tests can point a session at a
/// stub server. A trailing slash is dropped so endpoint paths concatenate
/// cleanly.
///
/// # Example
///
/// ```
/// use currencycloud_core::BaseUrl;
///
/// let base = BaseUrl::new("https://devapi.currencycloud.com/").unwrap();
/// assert_eq!(
///     base.endpoint("/v2/authenticate/api"),
///     "https://devapi.currencycloud.com/v2/authenticate/api"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Create a base URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidBaseUrl`] if the URL cannot be
    /// parsed, is relative, or uses plain HTTP for a non-local host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| ConfigurationError::InvalidBaseUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the absolute URL for an endpoint path such as `/v2/accounts/find`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(invalid(original, "must be an absolute URL"));
        }

        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        let scheme = url.scheme();
        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(invalid(
                original,
                "must use HTTPS (HTTP allowed only for localhost)",
            ));
        }

        if url.host_str().is_none() {
            return Err(invalid(original, "must have a host"));
        }

        Ok(())
    }
}

fn invalid(value: &str, reason: &str) -> Error {
    ConfigurationError::InvalidBaseUrl {
        value: value.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str().trim_end_matches('/'))
    }
}
