//! HTTP client shared by a session and its requests.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, trace};

use currencycloud_core::error::{ApiError, ConfigurationError, Error, StatusError, TransportError};
use currencycloud_core::{AuthToken, Credentials};

use crate::wire::{AUTH_TOKEN_HEADER, ErrorResponse, LoginForm, LoginResponse, USER_AGENT};

/// Thin wrapper over `reqwest::Client` that knows the service's headers
/// and error format.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client; `timeout` bounds each whole request when set.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigurationError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Start a request, attaching the token header when a token is present.
    pub fn request(&self, method: Method, url: &str, token: Option<&AuthToken>) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.header(AUTH_TOKEN_HEADER, token.as_str()),
            None => builder,
        }
    }

    /// Exchange credentials for a fresh token.
    pub async fn login(&self, url: &str, credentials: &Credentials) -> Result<AuthToken, ApiError> {
        debug!(%url, login_id = credentials.login_id(), "Requesting auth token");

        let form = LoginForm {
            login_id: credentials.login_id(),
            api_key: credentials.api_key(),
        };
        let body = self
            .dispatch(self.request(Method::POST, url, None).form(&form))
            .await?;

        let response: LoginResponse =
            serde_json::from_value(body).map_err(|e| ApiError::Decode {
                message: e.to_string(),
            })?;

        Ok(AuthToken::new(response.auth_token))
    }

    /// Send a request and decode a successful JSON body.
    ///
    /// An empty success body decodes to `Value::Null`.
    pub async fn dispatch(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        trace!(status = %status, "HTTP response");

        if !status.is_success() {
            return Err(parse_error_response(response).await.into());
        }

        let body = response.text().await.map_err(transport_error)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }
}

/// Parse a service error body. Bodies in other shapes still keep the status.
async fn parse_error_response(response: reqwest::Response) -> StatusError {
    let status = response.status().as_u16();

    match response.json::<ErrorResponse>().await {
        Ok(body) => {
            let messages = body.messages();
            StatusError::new(status, body.error_code, messages)
        }
        Err(_) => StatusError::new(status, None, Vec::new()),
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    ApiError::Transport(err)
}
