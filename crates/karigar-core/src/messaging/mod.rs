//! Messaging and unread-tracking engine.
//!
//! Each booking carries one append-only, timestamp-ordered thread. Read
//! state is tracked per message and only ever moves unread -> read. The
//! conversation list is a derived view: one summary per booking the user
//! participates in, ordered by last activity.

pub mod poller;

use chrono::{DateTime, Utc};
use karigar_types::booking::{Booking, BookingId};
use karigar_types::error::{MessageError, ValidationError};
use karigar_types::message::Message;
use karigar_types::user::{Role, UserId};
use tracing::info;

use crate::repository::booking::BookingRepository;
use crate::repository::message::MessageRepository;

/// One row of the conversation list.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub booking_id: BookingId,
    /// The other party, as seen from the requesting user's role.
    pub partner_id: UserId,
    pub partner_name: String,
    pub service_category: String,
    /// Content of the latest message, if the thread has any.
    pub last_message: Option<String>,
    /// Timestamp of the latest message, falling back to the booking's
    /// scheduled time for a message-less thread.
    pub last_activity: DateTime<Utc>,
    pub unread: u32,
}

/// Per-booking messaging with unread aggregation.
pub struct MessagingService<M: MessageRepository, B: BookingRepository> {
    messages: M,
    bookings: B,
}

impl<M: MessageRepository, B: BookingRepository> MessagingService<M, B> {
    pub fn new(messages: M, bookings: B) -> Self {
        Self { messages, bookings }
    }

    async fn require_booking(&self, booking_id: &BookingId) -> Result<Booking, MessageError> {
        self.bookings
            .get_by_id(booking_id)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?
            .ok_or(MessageError::BookingNotFound)
    }

    /// Append a user message to a booking's thread.
    ///
    /// Content must be non-blank; the booking must exist. The message lands
    /// unread with the current timestamp.
    pub async fn send(
        &self,
        booking_id: &BookingId,
        sender: UserId,
        content: &str,
    ) -> Result<Message, MessageError> {
        if content.trim().is_empty() {
            return Err(ValidationError::new("message content is empty").into());
        }
        self.require_booking(booking_id).await?;

        let message = Message::from_user(*booking_id, sender, content);
        self.messages
            .append(&message)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;

        info!(%booking_id, sender = %sender, "Message sent");
        Ok(message)
    }

    /// Read a booking's thread, oldest first.
    pub async fn thread(&self, booking_id: &BookingId) -> Result<Vec<Message>, MessageError> {
        self.require_booking(booking_id).await?;
        self.messages
            .list_for_booking(booking_id)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))
    }

    /// Mark everything the reader hasn't sent as read. Idempotent.
    pub async fn mark_read(
        &self,
        booking_id: &BookingId,
        reader: UserId,
    ) -> Result<(), MessageError> {
        self.require_booking(booking_id).await?;
        self.messages
            .mark_read(booking_id, &reader)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Count messages in the thread addressed to (i.e. not sent by) `user`
    /// that are still unread. System messages count until read.
    pub async fn unread_count(
        &self,
        booking_id: &BookingId,
        user: UserId,
    ) -> Result<u32, MessageError> {
        self.messages
            .unread_count(booking_id, &user)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))
    }

    /// Build the conversation list for a user acting in the given role,
    /// most recently active thread first.
    pub async fn conversations(
        &self,
        user_id: UserId,
        acting_as: Role,
    ) -> Result<Vec<ConversationSummary>, MessageError> {
        let bookings = self
            .bookings
            .list_for_user(&user_id, acting_as)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;

        let mut summaries = Vec::with_capacity(bookings.len());
        for booking in &bookings {
            let thread = self
                .messages
                .list_for_booking(&booking.id)
                .await
                .map_err(|e| MessageError::Storage(e.to_string()))?;
            let unread = self
                .messages
                .unread_count(&booking.id, &user_id)
                .await
                .map_err(|e| MessageError::Storage(e.to_string()))?;

            let (partner_id, partner_name) = match acting_as {
                Role::Customer => (booking.provider_id, booking.provider_name.clone()),
                Role::Provider => (booking.customer_id, booking.customer_name.clone()),
            };

            let last = thread.last();
            summaries.push(ConversationSummary {
                booking_id: booking.id,
                partner_id,
                partner_name,
                service_category: booking.service_category.clone(),
                last_message: last.map(|m| m.content.clone()),
                last_activity: last.map(|m| m.timestamp).unwrap_or(booking.scheduled_at),
                unread,
            });
        }

        summaries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingService;
    use crate::testing::MemStore;
    use karigar_types::user::UserProfile;

    struct Fixture {
        store: MemStore,
        booking: Booking,
        customer: UserProfile,
        provider_id: UserId,
    }

    async fn fixture() -> Fixture {
        let store = MemStore::new();
        let provider_id = store.add_provider("Ahmed Ali", "plumbing", "Gulberg, Lahore", 1500, 4.8, 42);
        let customer = UserProfile::new("zara@example.com", "Zara Khan");
        let booking = BookingService::new(store.clone(), store.clone(), store.clone())
            .create_booking(&customer, provider_id, Utc::now(), None)
            .await
            .unwrap();
        Fixture {
            store,
            booking,
            customer,
            provider_id,
        }
    }

    fn messaging(store: &MemStore) -> MessagingService<MemStore, MemStore> {
        MessagingService::new(store.clone(), store.clone())
    }

    #[tokio::test]
    async fn test_send_then_unread_then_mark_read() {
        let fx = fixture().await;
        let svc = messaging(&fx.store);

        // Clear the creation announcement first so only the peer message counts.
        svc.mark_read(&fx.booking.id, fx.customer.id).await.unwrap();

        svc.send(&fx.booking.id, fx.provider_id, "On my way.").await.unwrap();
        assert_eq!(svc.unread_count(&fx.booking.id, fx.customer.id).await.unwrap(), 1);
        // The sender has nothing unread from themselves.
        assert_eq!(svc.unread_count(&fx.booking.id, fx.provider_id).await.unwrap(), 0);

        svc.mark_read(&fx.booking.id, fx.customer.id).await.unwrap();
        assert_eq!(svc.unread_count(&fx.booking.id, fx.customer.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let fx = fixture().await;
        let svc = messaging(&fx.store);

        svc.send(&fx.booking.id, fx.provider_id, "hello").await.unwrap();
        svc.mark_read(&fx.booking.id, fx.customer.id).await.unwrap();
        svc.mark_read(&fx.booking.id, fx.customer.id).await.unwrap();
        assert_eq!(svc.unread_count(&fx.booking.id, fx.customer.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_read_spares_own_messages() {
        let fx = fixture().await;
        let svc = messaging(&fx.store);

        svc.send(&fx.booking.id, fx.customer.id, "are you coming?").await.unwrap();
        svc.mark_read(&fx.booking.id, fx.customer.id).await.unwrap();

        let thread = svc.thread(&fx.booking.id).await.unwrap();
        let own = thread
            .iter()
            .find(|m| m.sender.is_user(fx.customer.id))
            .unwrap();
        // The customer's own message stays unread until the provider reads it.
        // (The creation announcement was consumed by the customer's mark_read:
        // read state is per message, not per reader.)
        assert!(!own.is_read);
        assert_eq!(svc.unread_count(&fx.booking.id, fx.provider_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_blank_content_rejected() {
        let fx = fixture().await;
        let err = messaging(&fx.store)
            .send(&fx.booking.id, fx.customer.id, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, MessageError::Validation(_)));
    }

    #[tokio::test]
    async fn test_send_to_unknown_booking_rejected() {
        let fx = fixture().await;
        let err = messaging(&fx.store)
            .send(&BookingId::new(), fx.customer.id, "hello?")
            .await
            .unwrap_err();
        assert!(matches!(err, MessageError::BookingNotFound));
    }

    #[tokio::test]
    async fn test_thread_is_timestamp_ordered() {
        let fx = fixture().await;
        let svc = messaging(&fx.store);

        svc.send(&fx.booking.id, fx.customer.id, "first").await.unwrap();
        svc.send(&fx.booking.id, fx.provider_id, "second").await.unwrap();

        let thread = svc.thread(&fx.booking.id).await.unwrap();
        assert!(thread.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(thread.last().unwrap().content, "second");
    }

    #[tokio::test]
    async fn test_conversations_order_by_last_activity() {
        let store = MemStore::new();
        let provider_id = store.add_provider("Ahmed Ali", "plumbing", "Gulberg, Lahore", 1500, 4.8, 42);
        let customer = UserProfile::new("zara@example.com", "Zara Khan");
        let bookings = BookingService::new(store.clone(), store.clone(), store.clone());

        let older = bookings
            .create_booking(&customer, provider_id, Utc::now(), None)
            .await
            .unwrap();
        let newer = bookings
            .create_booking(&customer, provider_id, Utc::now(), None)
            .await
            .unwrap();

        let svc = messaging(&store);
        let list = svc.conversations(customer.id, Role::Customer).await.unwrap();
        assert_eq!(list[0].booking_id, newer.id);

        // New activity in the older thread moves it to the top.
        svc.send(&older.id, provider_id, "still pending?").await.unwrap();
        let list = svc.conversations(customer.id, Role::Customer).await.unwrap();
        assert_eq!(list[0].booking_id, older.id);
        assert_eq!(list[0].last_message.as_deref(), Some("still pending?"));
    }

    #[tokio::test]
    async fn test_conversations_pick_partner_by_role() {
        let fx = fixture().await;
        let svc = messaging(&fx.store);

        let as_customer = svc.conversations(fx.customer.id, Role::Customer).await.unwrap();
        assert_eq!(as_customer[0].partner_name, "Ahmed Ali");

        let as_provider = svc.conversations(fx.provider_id, Role::Provider).await.unwrap();
        assert_eq!(as_provider[0].partner_name, "Zara Khan");
    }

    #[tokio::test]
    async fn test_thread_never_empty_after_creation() {
        let fx = fixture().await;
        let thread = messaging(&fx.store).thread(&fx.booking.id).await.unwrap();
        assert!(!thread.is_empty());
    }
}
