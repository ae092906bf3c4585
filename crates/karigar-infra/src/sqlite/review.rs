//! SQLite review repository implementation.

use karigar_core::repository::review::ReviewRepository;
use karigar_types::error::RepositoryError;
use karigar_types::review::{Review, ReviewId};
use karigar_types::user::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ReviewRepository`.
pub struct SqliteReviewRepository {
    pool: DatabasePool,
}

impl SqliteReviewRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Review.
struct ReviewRow {
    id: String,
    provider_id: String,
    reviewer_name: String,
    rating: i64,
    comment: String,
    date: String,
}

impl ReviewRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            provider_id: row.try_get("provider_id")?,
            reviewer_name: row.try_get("reviewer_name")?,
            rating: row.try_get("rating")?,
            comment: row.try_get("comment")?,
            date: row.try_get("date")?,
        })
    }

    fn into_review(self) -> Result<Review, RepositoryError> {
        let id = self
            .id
            .parse::<ReviewId>()
            .map_err(|e| RepositoryError::Query(format!("invalid review id: {e}")))?;
        let provider_id = self
            .provider_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid provider id: {e}")))?;
        let date = parse_datetime(&self.date)?;

        Ok(Review {
            id,
            provider_id,
            reviewer_name: self.reviewer_name,
            rating: self.rating as u8,
            comment: self.comment,
            date,
        })
    }
}

impl ReviewRepository for SqliteReviewRepository {
    async fn append(&self, review: &Review) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO reviews (id, provider_id, reviewer_name, rating, comment, date)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(review.id.to_string())
        .bind(review.provider_id.to_string())
        .bind(&review.reviewer_name)
        .bind(review.rating as i64)
        .bind(&review.comment)
        .bind(format_datetime(&review.date))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_for_provider(
        &self,
        provider_id: &UserId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM reviews WHERE provider_id = ? ORDER BY date DESC")
            .bind(provider_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut reviews = Vec::with_capacity(rows.len());
        for row in &rows {
            let review_row =
                ReviewRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            reviews.push(review_row.into_review()?);
        }
        Ok(reviews)
    }
}
