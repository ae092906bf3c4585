//! MessageRepository trait definition.

use karigar_types::booking::BookingId;
use karigar_types::error::RepositoryError;
use karigar_types::message::Message;
use karigar_types::user::UserId;

/// Repository trait for per-booking message persistence.
///
/// Threads are append-only; the only permitted mutation is flipping
/// `is_read` to true via [`MessageRepository::mark_read`].
pub trait MessageRepository: Send + Sync {
    /// Append a message to its booking's thread.
    fn append(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a booking's thread, ordered by timestamp ascending.
    fn list_for_booking(
        &self,
        booking_id: &BookingId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Mark every message in the thread not sent by `reader` as read.
    /// Idempotent. Returns the number of rows that actually flipped.
    fn mark_read(
        &self,
        booking_id: &BookingId,
        reader: &UserId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count messages in the thread not sent by `user` and not yet read.
    fn unread_count(
        &self,
        booking_id: &BookingId,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}
