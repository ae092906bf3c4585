//! ReviewRepository trait definition.

use karigar_types::error::RepositoryError;
use karigar_types::review::Review;
use karigar_types::user::UserId;

/// Repository trait for review persistence. Reviews are append-only.
pub trait ReviewRepository: Send + Sync {
    /// Append a review record.
    fn append(
        &self,
        review: &Review,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List reviews for a provider, newest first.
    fn list_for_provider(
        &self,
        provider_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Review>, RepositoryError>> + Send;
}
