//! Authenticated request execution and the re-authentication protocol.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};

use currencycloud_core::error::{ApiError, Error};
use currencycloud_core::params::camelize;
use currencycloud_core::{AuthToken, Params, Result};

use crate::session::Session;
use crate::wire::ON_BEHALF_OF_PARAM;

/// Token requests made after a 401 before giving up.
const REAUTH_ATTEMPTS: u32 = 3;

impl Session {
    /// Send an authenticated request and return the camelized JSON response.
    ///
    /// Parameter keys are snakeized and sent on the query string for `GET`,
    /// in a form body otherwise. While an [`on_behalf_of`](Session::on_behalf_of)
    /// scope is active the subject id is added to the parameters.
    ///
    /// A 401 received while a token is held triggers up to three token
    /// requests; after the first success the request is retried exactly once.
    ///
    /// # Errors
    ///
    /// Remote failures surface as [`Error::Api`]. When every re-authentication
    /// attempt fails, the last re-authentication error is returned rather
    /// than the original 401.
    #[instrument(skip(self, params), fields(%method))]
    pub async fn execute<P>(&self, method: Method, path: &str, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        let mut params = Params::from_serialize(params)?;
        if let Some(subject) = self.delegation_subject() {
            params.insert(ON_BEHALF_OF_PARAM, subject.to_string());
        }
        let pairs = params.to_wire_pairs();

        let (url, token) = self.prepare(path).await?;
        let result = self.send(&method, &url, token.as_ref(), &pairs).await;
        match result {
            Ok(body) => Ok(camelize(body)),
            Err(err) if err.is_unauthorized() => match token {
                Some(stale) => {
                    debug!("Token rejected, re-authenticating");
                    self.reauthenticate(&stale).await?;

                    let (url, token) = self.prepare(path).await?;
                    let body = self.send(&method, &url, token.as_ref(), &pairs).await?;
                    Ok(camelize(body))
                }
                None => Err(Error::Api(err)),
            },
            Err(err) => Err(Error::Api(err)),
        }
    }

    /// Like [`execute`](Session::execute), deserializing the camelized response.
    pub async fn execute_as<P, R>(&self, method: Method, path: &str, params: &P) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.execute(method, path, params).await?;
        serde_json::from_value(body).map_err(|e| {
            Error::Api(ApiError::Decode {
                message: e.to_string(),
            })
        })
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        token: Option<&AuthToken>,
        pairs: &[(String, String)],
    ) -> std::result::Result<Value, ApiError> {
        let client = &self.inner.client;
        let request = client.request(method.clone(), url, token);

        // GET carries parameters on the query string, everything else in the body.
        let request = if *method == Method::GET {
            request.query(pairs)
        } else if pairs.is_empty() {
            request
        } else {
            request.form(pairs)
        };

        client.dispatch(request).await
    }

    /// Obtain a fresh token after `stale` was rejected.
    ///
    /// Only one re-authentication runs at a time per session. If another
    /// request already replaced `stale` while this one waited, no token
    /// request is made. A cleared token always re-authenticates.
    async fn reauthenticate(&self, stale: &AuthToken) -> Result<()> {
        let _serialized = self.inner.reauth.lock().await;

        let current = self.current_token().await;
        if matches!(current, Some(ref token) if token != stale) {
            debug!("Token already refreshed by a concurrent request");
            return Ok(());
        }

        let delay = self.inner.options.reauth_delay;
        let mut attempt = 1;
        loop {
            match self.fetch_token().await {
                Ok(_) => {
                    info!(attempt, "Re-authenticated");
                    return Ok(());
                }
                Err(err) if attempt >= REAUTH_ATTEMPTS => return Err(err),
                Err(err) => {
                    debug!(attempt, error = %err, "Re-authentication attempt failed");
                    attempt += 1;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}
