//! UserRepository trait definition.

use karigar_types::error::RepositoryError;
use karigar_types::user::{UserId, UserProfile};

/// Repository trait for user account persistence.
///
/// Implementations live in karigar-infra (e.g., `SqliteUserRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait UserRepository: Send + Sync {
    /// Get a user by email, case-insensitively.
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>, RepositoryError>> + Send;

    /// Get a user by id.
    fn get_by_id(
        &self,
        id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>, RepositoryError>> + Send;

    /// Insert or replace a user record. Returns `Conflict` when the email is
    /// already taken by a different account.
    fn save(
        &self,
        user: &UserProfile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
