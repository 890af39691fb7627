//! Session and token lifecycle.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use currencycloud_core::error::{Error, StateError};
use currencycloud_core::{AuthToken, BaseUrl, Credentials, Environments, Result, SubjectId};

use crate::client::HttpClient;
use crate::wire::DEFAULT_AUTH_PATH;

const DEFAULT_REAUTH_DELAY: Duration = Duration::from_millis(250);

/// Options fixed for the lifetime of a [`Session`].
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub(crate) environments: Environments,
    pub(crate) reauth_delay: Duration,
    pub(crate) timeout: Option<Duration>,
}

impl SessionOptions {
    /// Replace the environment table used by `authenticate`.
    pub fn environments(mut self, environments: Environments) -> Self {
        self.environments = environments;
        self
    }

    /// Fixed delay between failed re-authentication attempts.
    pub fn reauth_delay(mut self, delay: Duration) -> Self {
        self.reauth_delay = delay;
        self
    }

    /// Per-request timeout applied by the HTTP client. Unset by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            environments: Environments::default(),
            reauth_delay: DEFAULT_REAUTH_DELAY,
            timeout: None,
        }
    }
}

/// An authenticated connection to the Currencycloud API.
///
/// A session is created empty, populated by [`Session::authenticate`],
/// refreshed any number of times by [`Session::request_token`], and emptied
/// by [`Session::close`]. Requests go through [`Session::execute`].
///
/// Sessions are cheap to clone; clones share the same token and
/// delegation scope.
///
/// # Example
///
/// ```no_run
/// use currencycloud_http::{Credentials, Method, Params, Session};
///
/// # async fn example() -> currencycloud_http::Result<()> {
/// let session = Session::new()?;
/// session
///     .authenticate("demonstration", Credentials::new("dev@example.com", "api-key"))
///     .await?;
///
/// let accounts = session
///     .execute(Method::GET, "/v2/accounts/find", &Params::new().with("perPage", 5))
///     .await?;
/// println!("{}", accounts);
///
/// session.close("/v2/authenticate/close_session").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    pub(crate) inner: Arc<SessionInner>,
}

pub(crate) struct SessionInner {
    pub(crate) client: HttpClient,
    pub(crate) options: SessionOptions,
    pub(crate) state: RwLock<SessionState>,
    /// Serializes re-authentication across concurrent requests.
    pub(crate) reauth: Mutex<()>,
    pub(crate) scope: StdMutex<Option<SubjectId>>,
}

#[derive(Default)]
pub(crate) struct SessionState {
    pub(crate) config: Option<SessionConfig>,
    pub(crate) token: Option<AuthToken>,
}

#[derive(Clone)]
pub(crate) struct SessionConfig {
    pub(crate) base_url: BaseUrl,
    pub(crate) credentials: Credentials,
    pub(crate) auth_path: String,
}

impl Session {
    /// Create an unauthenticated session with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(SessionOptions::default())
    }

    /// Create an unauthenticated session.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn with_options(options: SessionOptions) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(SessionInner {
                client: HttpClient::new(options.timeout)?,
                options,
                state: RwLock::new(SessionState::default()),
                reauth: Mutex::new(()),
                scope: StdMutex::new(None),
            }),
        })
    }

    /// Authenticate against the default token endpoint.
    pub async fn authenticate(&self, environment: &str, credentials: Credentials) -> Result<String> {
        self.authenticate_with_path(environment, credentials, DEFAULT_AUTH_PATH)
            .await
    }

    /// Resolve `environment`, store the configuration and request a token.
    ///
    /// Returns the new token.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error, without any network call, if the
    /// environment is not in the table. A failed token request surfaces as
    /// an API error and is not retried.
    #[instrument(skip(self, credentials), fields(login_id = %credentials.login_id()))]
    pub async fn authenticate_with_path(
        &self,
        environment: &str,
        credentials: Credentials,
        auth_path: &str,
    ) -> Result<String> {
        let base_url = self.inner.options.environments.resolve(environment)?;
        info!(%base_url, "Authenticating");

        self.inner.state.write().await.config = Some(SessionConfig {
            base_url,
            credentials,
            auth_path: auth_path.to_string(),
        });

        let token = self.fetch_token().await?;
        Ok(token.into_string())
    }

    /// Request a fresh token with the stored credentials.
    ///
    /// On success the token replaces the current one. On failure the current
    /// token is left in place.
    #[instrument(skip(self))]
    pub async fn request_token(&self) -> Result<String> {
        let token = self.fetch_token().await?;
        Ok(token.into_string())
    }

    pub(crate) async fn fetch_token(&self) -> Result<AuthToken> {
        let config = self.config().await?;
        let url = config.base_url.endpoint(&config.auth_path);

        let token = self.inner.client.login(&url, &config.credentials).await?;

        self.inner.state.write().await.token = Some(token.clone());
        debug!("Auth token acquired");
        Ok(token)
    }

    /// Sign out at `path` and clear the stored token and configuration.
    ///
    /// # Errors
    ///
    /// If the sign-out call fails the session is left untouched and still
    /// authenticated.
    #[instrument(skip(self))]
    pub async fn close(&self, path: &str) -> Result<()> {
        let (url, token) = self.prepare(path).await?;

        self.inner
            .client
            .dispatch(
                self.inner
                    .client
                    .request(reqwest::Method::POST, &url, token.as_ref()),
            )
            .await?;

        let mut state = self.inner.state.write().await;
        state.config = None;
        state.token = None;
        info!("Session closed");
        Ok(())
    }

    /// Returns the current token, if any.
    pub async fn token(&self) -> Option<String> {
        self.current_token()
            .await
            .map(AuthToken::into_string)
    }

    /// Replace or clear the current token, e.g. to restore a persisted one.
    pub async fn set_token(&self, token: Option<String>) {
        self.inner.state.write().await.token = token.map(AuthToken::new);
    }

    /// True while a token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.read().await.token.is_some()
    }

    /// Returns the base URL resolved by the last `authenticate`.
    pub async fn base_url(&self) -> Option<BaseUrl> {
        self.inner
            .state
            .read()
            .await
            .config
            .as_ref()
            .map(|config| config.base_url.clone())
    }

    pub(crate) async fn current_token(&self) -> Option<AuthToken> {
        self.inner.state.read().await.token.clone()
    }

    async fn config(&self) -> Result<SessionConfig> {
        self.inner
            .state
            .read()
            .await
            .config
            .clone()
            .ok_or_else(|| Error::State(StateError::NotAuthenticated))
    }

    /// Resolve `path` against the base URL and snapshot the current token.
    pub(crate) async fn prepare(&self, path: &str) -> Result<(String, Option<AuthToken>)> {
        let state = self.inner.state.read().await;
        let config = state
            .config
            .as_ref()
            .ok_or(Error::State(StateError::NotAuthenticated))?;
        Ok((config.base_url.endpoint(path), state.token.clone()))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.inner.options)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_session_is_unauthenticated() {
        let session = Session::new().unwrap();
        assert!(!session.is_authenticated().await);
        assert_eq!(session.token().await, None);
        assert_eq!(session.base_url().await, None);
    }

    #[tokio::test]
    async fn request_token_before_authenticate_is_state_error() {
        let session = Session::new().unwrap();
        let err = session.request_token().await.unwrap_err();
        assert!(matches!(err, Error::State(StateError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn set_token_seeds_and_clears() {
        let session = Session::new().unwrap();
        session.set_token(Some("restored".to_string())).await;
        assert_eq!(session.token().await.as_deref(), Some("restored"));

        session.set_token(None).await;
        assert!(!session.is_authenticated().await);
    }

    #[test]
    fn debug_redacts_token() {
        let session = Session::new().unwrap();
        let debug = format!("{:?}", session);
        assert!(debug.contains("[REDACTED]"));
    }
}
