//! SQLite booking repository implementation.
//!
//! Status is the only mutable column and goes through a version-checked
//! compare-and-swap, so racing writers cannot silently overwrite each other.

use karigar_core::repository::booking::BookingRepository;
use karigar_types::booking::{Booking, BookingId, BookingStatus};
use karigar_types::error::RepositoryError;
use karigar_types::user::{Role, UserId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `BookingRepository`.
pub struct SqliteBookingRepository {
    pool: DatabasePool,
}

impl SqliteBookingRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let booking_row = BookingRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(booking_row.into_booking()?))
            }
            None => Ok(None),
        }
    }
}

/// Internal row type for mapping SQLite rows to domain Booking.
struct BookingRow {
    id: String,
    customer_id: String,
    provider_id: String,
    customer_name: String,
    provider_name: String,
    service_category: String,
    status: String,
    scheduled_at: String,
    total_price: i64,
    address: Option<String>,
    version: i64,
    created_at: String,
}

impl BookingRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            provider_id: row.try_get("provider_id")?,
            customer_name: row.try_get("customer_name")?,
            provider_name: row.try_get("provider_name")?,
            service_category: row.try_get("service_category")?,
            status: row.try_get("status")?,
            scheduled_at: row.try_get("scheduled_at")?,
            total_price: row.try_get("total_price")?,
            address: row.try_get("address")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_booking(self) -> Result<Booking, RepositoryError> {
        let id = self
            .id
            .parse::<BookingId>()
            .map_err(|e| RepositoryError::Query(format!("invalid booking id: {e}")))?;
        let customer_id = self
            .customer_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid customer id: {e}")))?;
        let provider_id = self
            .provider_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid provider id: {e}")))?;
        let status: BookingStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let scheduled_at = parse_datetime(&self.scheduled_at)?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Booking {
            id,
            customer_id,
            provider_id,
            customer_name: self.customer_name,
            provider_name: self.provider_name,
            service_category: self.service_category,
            status,
            scheduled_at,
            total_price: self.total_price,
            address: self.address,
            version: self.version,
            created_at,
        })
    }
}

impl BookingRepository for SqliteBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO bookings (id, customer_id, provider_id, customer_name, provider_name, service_category, status, scheduled_at, total_price, address, version, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(booking.id.to_string())
        .bind(booking.customer_id.to_string())
        .bind(booking.provider_id.to_string())
        .bind(&booking.customer_name)
        .bind(&booking.provider_name)
        .bind(&booking.service_category)
        .bind(booking.status.to_string())
        .bind(format_datetime(&booking.scheduled_at))
        .bind(booking.total_price)
        .bind(&booking.address)
        .bind(booking.version)
        .bind(format_datetime(&booking.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_by_id(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        self.fetch(id).await
    }

    async fn list_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in &rows {
            let booking_row =
                BookingRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            bookings.push(booking_row.into_booking()?);
        }
        Ok(bookings)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        role: Role,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let column = match role {
            Role::Customer => "customer_id",
            Role::Provider => "provider_id",
        };
        let sql = format!("SELECT * FROM bookings WHERE {column} = ? ORDER BY created_at DESC");
        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in &rows {
            let booking_row =
                BookingRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            bookings.push(booking_row.into_booking()?);
        }
        Ok(bookings)
    }

    async fn update_status(
        &self,
        id: &BookingId,
        new_status: BookingStatus,
        expected_version: i64,
    ) -> Result<Booking, RepositoryError> {
        let result = sqlx::query(
            "UPDATE bookings SET status = ?, version = version + 1 WHERE id = ? AND version = ?",
        )
        .bind(new_status.to_string())
        .bind(id.to_string())
        .bind(expected_version)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Either the booking is gone or another writer bumped the version.
            return match self.fetch(id).await? {
                Some(current) => Err(RepositoryError::Conflict(format!(
                    "expected version {expected_version}, found {}",
                    current.version
                ))),
                None => Err(RepositoryError::NotFound),
            };
        }

        self.fetch(id).await?.ok_or(RepositoryError::NotFound)
    }
}
