//! Acting on behalf of another contact.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument};

use currencycloud_core::error::{Error, StateError};
use currencycloud_core::{Result, SubjectId};

use crate::session::Session;

impl Session {
    /// Run `operation` with every request on this session made on behalf of
    /// the contact `subject_id`.
    ///
    /// The scope is released when the operation finishes, whether it
    /// succeeds, fails, or is dropped before completion.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::SubjectId`](currencycloud_core::ValidationError::SubjectId)
    ///   if `subject_id` is not a lowercase hyphenated UUID.
    /// - [`StateError::AlreadyScoped`] if another scope is active on this session.
    ///
    /// Neither error runs the operation.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use currencycloud_http::{Method, Params, Session};
    ///
    /// # async fn example(session: Session) -> currencycloud_http::Result<()> {
    /// let scoped = session.clone();
    /// let balances = session
    ///     .on_behalf_of("c6ece846-6df1-461d-acaa-b42a6aa74045", move || async move {
    ///         scoped
    ///             .execute(Method::GET, "/v2/balances/find", &Params::new())
    ///             .await
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, operation))]
    pub async fn on_behalf_of<F, Fut, T>(&self, subject_id: &str, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let subject = SubjectId::new(subject_id)?;
        let _scope = ScopeGuard::acquire(&self.inner.scope, subject)?;
        debug!(%subject, "Delegation scope active");

        operation().await
    }

    /// Returns the contact requests are currently made on behalf of.
    pub fn delegation_subject(&self) -> Option<SubjectId> {
        *lock(&self.inner.scope)
    }
}

/// Holds the session's single delegation slot and empties it on drop.
struct ScopeGuard<'a> {
    slot: &'a Mutex<Option<SubjectId>>,
}

impl<'a> ScopeGuard<'a> {
    fn acquire(slot: &'a Mutex<Option<SubjectId>>, subject: SubjectId) -> Result<Self> {
        let mut active = lock(slot);
        if active.is_some() {
            return Err(Error::State(StateError::AlreadyScoped));
        }
        *active = Some(subject);
        Ok(Self { slot })
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        *lock(self.slot) = None;
        debug!("Delegation scope released");
    }
}

// The slot only ever holds a Copy value, so a poisoned lock is still consistent.
fn lock(slot: &Mutex<Option<SubjectId>>) -> MutexGuard<'_, Option<SubjectId>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
