//! SQLite message repository implementation.
//!
//! Messages reference their booking with a real foreign key; deleting a
//! booking cascades to its thread. `mark_read` and `unread_count` push the
//! sender comparison into SQL so the thread never needs to be materialized
//! for bookkeeping.

use karigar_core::repository::message::MessageRepository;
use karigar_types::booking::BookingId;
use karigar_types::error::RepositoryError;
use karigar_types::message::{Message, MessageId, Sender};
use karigar_types::user::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Message.
struct MessageRow {
    id: String,
    booking_id: String,
    sender: String,
    content: String,
    timestamp: String,
    is_read: bool,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            booking_id: row.try_get("booking_id")?,
            sender: row.try_get("sender")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
            is_read: row.try_get("is_read")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let id = self
            .id
            .parse::<MessageId>()
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let booking_id = self
            .booking_id
            .parse::<BookingId>()
            .map_err(|e| RepositoryError::Query(format!("invalid booking id: {e}")))?;
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let timestamp = parse_datetime(&self.timestamp)?;

        Ok(Message {
            id,
            booking_id,
            sender,
            content: self.content,
            timestamp,
            is_read: self.is_read,
        })
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO messages (id, booking_id, sender, content, timestamp, is_read)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(message.booking_id.to_string())
        .bind(message.sender.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.timestamp))
        .bind(message.is_read)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_for_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM messages WHERE booking_id = ? ORDER BY timestamp ASC")
            .bind(booking_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }
        Ok(messages)
    }

    async fn mark_read(
        &self,
        booking_id: &BookingId,
        reader: &UserId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = 1
             WHERE booking_id = ? AND sender != ? AND is_read = 0",
        )
        .bind(booking_id.to_string())
        .bind(reader.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn unread_count(
        &self,
        booking_id: &BookingId,
        user: &UserId,
    ) -> Result<u32, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages
             WHERE booking_id = ? AND sender != ? AND is_read = 0",
        )
        .bind(booking_id.to_string())
        .bind(user.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::booking::SqliteBookingRepository;
    use crate::sqlite::pool::DatabasePool;
    use chrono::Utc;
    use karigar_core::repository::booking::BookingRepository as _;
    use karigar_types::booking::{Booking, BookingStatus};

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn booking_in(pool: &DatabasePool) -> Booking {
        let booking = Booking {
            id: BookingId::new(),
            customer_id: UserId::new(),
            provider_id: UserId::new(),
            customer_name: "Zara Khan".to_string(),
            provider_name: "Ahmed Ali".to_string(),
            service_category: "plumbing".to_string(),
            status: BookingStatus::Pending,
            scheduled_at: Utc::now(),
            total_price: 1500,
            address: None,
            version: 0,
            created_at: Utc::now(),
        };
        SqliteBookingRepository::new(pool.clone())
            .create(&booking)
            .await
            .unwrap();
        booking
    }

    #[tokio::test]
    async fn test_append_and_list_ordered() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool.clone());
        let booking = booking_in(&pool).await;

        repo.append(&Message::from_system(booking.id, "Booking created."))
            .await
            .unwrap();
        repo.append(&Message::from_user(booking.id, booking.customer_id, "hello"))
            .await
            .unwrap();

        let thread = repo.list_for_booking(&booking.id).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].sender, Sender::System);
        assert_eq!(thread[1].content, "hello");
        assert!(thread.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_append_rejects_unknown_booking() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool);

        // Foreign key on booking_id rejects orphan messages.
        let err = repo
            .append(&Message::from_system(BookingId::new(), "orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }

    #[tokio::test]
    async fn test_mark_read_flips_only_peer_messages() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool.clone());
        let booking = booking_in(&pool).await;

        repo.append(&Message::from_system(booking.id, "Booking created."))
            .await
            .unwrap();
        repo.append(&Message::from_user(booking.id, booking.customer_id, "coming?"))
            .await
            .unwrap();
        repo.append(&Message::from_user(booking.id, booking.provider_id, "on my way"))
            .await
            .unwrap();

        let flipped = repo.mark_read(&booking.id, &booking.customer_id).await.unwrap();
        assert_eq!(flipped, 2); // system + provider message

        let thread = repo.list_for_booking(&booking.id).await.unwrap();
        let own = thread
            .iter()
            .find(|m| m.sender.is_user(booking.customer_id))
            .unwrap();
        assert!(!own.is_read);

        // Second call finds nothing left to flip.
        assert_eq!(repo.mark_read(&booking.id, &booking.customer_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unread_count_excludes_own_and_read() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool.clone());
        let booking = booking_in(&pool).await;

        repo.append(&Message::from_user(booking.id, booking.provider_id, "x"))
            .await
            .unwrap();

        assert_eq!(repo.unread_count(&booking.id, &booking.customer_id).await.unwrap(), 1);
        assert_eq!(repo.unread_count(&booking.id, &booking.provider_id).await.unwrap(), 0);

        repo.mark_read(&booking.id, &booking.customer_id).await.unwrap();
        assert_eq!(repo.unread_count(&booking.id, &booking.customer_id).await.unwrap(), 0);
    }
}
