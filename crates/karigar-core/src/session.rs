//! Session restore.
//!
//! The active account's email lives in an external cache the core does not
//! own (a file on disk in the default setup). On startup the cached email is
//! looked up in the user repository; a stale cache entry simply yields no
//! session.

use karigar_types::error::SessionError;
use karigar_types::user::UserProfile;
use tracing::{debug, info};

use crate::repository::user::UserRepository;

/// Port for the external cache holding the active account's email.
///
/// Implementations live in karigar-infra (e.g., `FileSessionCache`).
pub trait SessionCache: Send + Sync {
    fn store_active_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;

    fn load_active_email(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<String>, SessionError>> + Send;

    fn clear(&self) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;
}

/// Login/logout bookkeeping plus startup rehydration.
pub struct SessionManager<S: SessionCache, U: UserRepository> {
    cache: S,
    users: U,
}

impl<S: SessionCache, U: UserRepository> SessionManager<S, U> {
    pub fn new(cache: S, users: U) -> Self {
        Self { cache, users }
    }

    /// Record `user` as the active account.
    pub async fn login(&self, user: &UserProfile) -> Result<(), SessionError> {
        self.cache.store_active_email(&user.email).await?;
        info!(user = %user.id, "Session started");
        Ok(())
    }

    /// Forget the active account.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.cache.clear().await?;
        info!("Session cleared");
        Ok(())
    }

    /// Rehydrate the active user from the cached email, if both the cache
    /// entry and the account still exist.
    pub async fn restore(&self) -> Result<Option<UserProfile>, SessionError> {
        let Some(email) = self.cache.load_active_email().await? else {
            return Ok(None);
        };
        let user = self
            .users
            .get_by_email(&email)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        if user.is_none() {
            debug!(email, "cached session email no longer matches an account");
        }
        Ok(user)
    }
}
