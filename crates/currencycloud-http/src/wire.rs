//! Wire-level constants and request/response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Header carrying the session token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Default relative path of the token endpoint.
pub const DEFAULT_AUTH_PATH: &str = "/v2/authenticate/api";

/// Query/body parameter naming the contact a request acts for.
pub const ON_BEHALF_OF_PARAM: &str = "onBehalfOf";

/// Product identifier sent as `User-Agent` on every request.
pub const USER_AGENT: &str = concat!("CurrencyCloudSDK/2.0 Rust/", env!("CARGO_PKG_VERSION"));

/// Form body for the token endpoint.
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub login_id: &'a str,
    pub api_key: &'a str,
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub auth_token: String,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_messages: BTreeMap<String, Vec<ErrorMessage>>,
}

/// A single per-field message inside an [`ErrorResponse`].
#[derive(Debug, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorResponse {
    /// Flatten `error_messages` to `field: message` strings.
    pub fn messages(&self) -> Vec<String> {
        self.error_messages
            .iter()
            .flat_map(|(field, entries)| {
                entries
                    .iter()
                    .map(move |entry| format!("{}: {}", field, entry.message))
            })
            .collect()
    }
}
