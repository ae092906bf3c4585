//! BookingRepository trait definition.

use karigar_types::booking::{Booking, BookingId, BookingStatus};
use karigar_types::error::RepositoryError;
use karigar_types::user::{Role, UserId};

/// Repository trait for booking persistence.
///
/// `status` (together with its `version` stamp) is the only mutable part of
/// a booking; there is deliberately no whole-record update.
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking.
    fn create(
        &self,
        booking: &Booking,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a booking by id.
    fn get_by_id(
        &self,
        id: &BookingId,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, RepositoryError>> + Send;

    /// List every booking, newest first.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, RepositoryError>> + Send;

    /// List the bookings a user participates in, in the given capacity,
    /// newest first.
    fn list_for_user(
        &self,
        user_id: &UserId,
        role: Role,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, RepositoryError>> + Send;

    /// Compare-and-swap status write.
    ///
    /// Applies `new_status` and bumps the version only if the stored version
    /// still equals `expected_version`. Returns the updated booking,
    /// `NotFound` if the id is unknown, or `Conflict` if another writer got
    /// there first.
    fn update_status(
        &self,
        id: &BookingId,
        new_status: BookingStatus,
        expected_version: i64,
    ) -> impl std::future::Future<Output = Result<Booking, RepositoryError>> + Send;
}
