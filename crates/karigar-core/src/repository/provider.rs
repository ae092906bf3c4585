//! ProviderRepository trait definition.

use karigar_types::error::RepositoryError;
use karigar_types::provider::{ProviderDetails, ProviderListing};
use karigar_types::user::UserId;

/// Repository trait for provider profile persistence.
///
/// Listings join the details record with the owning account's display name;
/// the directory only ever ranks listings.
pub trait ProviderRepository: Send + Sync {
    /// Insert or replace a provider details record.
    fn save_details(
        &self,
        details: &ProviderDetails,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get the raw details record for a user, if one exists.
    fn get_details(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<ProviderDetails>, RepositoryError>> + Send;

    /// Get a single listing (details + display name), if one exists.
    fn get_listing(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<ProviderListing>, RepositoryError>> + Send;

    /// List the whole directory, ordered by join date ascending.
    fn list_listings(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ProviderListing>, RepositoryError>> + Send;

    /// Overwrite the review aggregates for a provider.
    ///
    /// Reserved for the review engine; nothing else may move these fields.
    fn update_rating(
        &self,
        user_id: &UserId,
        rating: f64,
        review_count: u32,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Count provider records (used to make directory seeding idempotent).
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
