//! SQLite provider repository implementation.
//!
//! Listings are the join of `providers` with the owning `users` row; the
//! directory never sees a details record without its display name.

use karigar_core::repository::provider::ProviderRepository;
use karigar_types::error::RepositoryError;
use karigar_types::provider::{GeoPoint, ProviderDetails, ProviderListing};
use karigar_types::user::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ProviderRepository`.
pub struct SqliteProviderRepository {
    pool: DatabasePool,
}

impl SqliteProviderRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ProviderDetails.
struct ProviderRow {
    user_id: String,
    bio: String,
    hourly_rate: i64,
    verified: bool,
    categories: String,
    rating: f64,
    review_count: i64,
    location: String,
    lat: f64,
    lng: f64,
    experience_years: i64,
    service_radius_km: i64,
    images: String,
    joined_at: String,
}

impl ProviderRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            bio: row.try_get("bio")?,
            hourly_rate: row.try_get("hourly_rate")?,
            verified: row.try_get("verified")?,
            categories: row.try_get("categories")?,
            rating: row.try_get("rating")?,
            review_count: row.try_get("review_count")?,
            location: row.try_get("location")?,
            lat: row.try_get("lat")?,
            lng: row.try_get("lng")?,
            experience_years: row.try_get("experience_years")?,
            service_radius_km: row.try_get("service_radius_km")?,
            images: row.try_get("images")?,
            joined_at: row.try_get("joined_at")?,
        })
    }

    fn into_details(self) -> Result<ProviderDetails, RepositoryError> {
        let user_id = self
            .user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid provider user id: {e}")))?;
        let categories: Vec<String> = serde_json::from_str(&self.categories)
            .map_err(|e| RepositoryError::Query(format!("invalid categories JSON: {e}")))?;
        let images: Vec<String> = serde_json::from_str(&self.images)
            .map_err(|e| RepositoryError::Query(format!("invalid images JSON: {e}")))?;
        let joined_at = parse_datetime(&self.joined_at)?;

        Ok(ProviderDetails {
            user_id,
            bio: self.bio,
            hourly_rate: self.hourly_rate,
            verified: self.verified,
            categories,
            rating: self.rating,
            review_count: self.review_count as u32,
            location: self.location,
            coordinates: GeoPoint {
                lat: self.lat,
                lng: self.lng,
            },
            experience_years: self.experience_years as u32,
            service_radius_km: self.service_radius_km as u32,
            images,
            joined_at,
        })
    }
}

fn listing_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProviderListing, RepositoryError> {
    let full_name: String = row
        .try_get("full_name")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let details = ProviderRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_details()?;
    Ok(ProviderListing { full_name, details })
}

impl ProviderRepository for SqliteProviderRepository {
    async fn save_details(&self, details: &ProviderDetails) -> Result<(), RepositoryError> {
        let categories_json = serde_json::to_string(&details.categories)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let images_json = serde_json::to_string(&details.images)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO providers (user_id, bio, hourly_rate, verified, categories, rating, review_count, location, lat, lng, experience_years, service_radius_km, images, joined_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 bio = excluded.bio,
                 hourly_rate = excluded.hourly_rate,
                 verified = excluded.verified,
                 categories = excluded.categories,
                 rating = excluded.rating,
                 review_count = excluded.review_count,
                 location = excluded.location,
                 lat = excluded.lat,
                 lng = excluded.lng,
                 experience_years = excluded.experience_years,
                 service_radius_km = excluded.service_radius_km,
                 images = excluded.images,
                 joined_at = excluded.joined_at",
        )
        .bind(details.user_id.to_string())
        .bind(&details.bio)
        .bind(details.hourly_rate)
        .bind(details.verified)
        .bind(&categories_json)
        .bind(details.rating)
        .bind(details.review_count as i64)
        .bind(&details.location)
        .bind(details.coordinates.lat)
        .bind(details.coordinates.lng)
        .bind(details.experience_years as i64)
        .bind(details.service_radius_km as i64)
        .bind(&images_json)
        .bind(format_datetime(&details.joined_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_details(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProviderDetails>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM providers WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let provider_row = ProviderRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(provider_row.into_details()?))
            }
            None => Ok(None),
        }
    }

    async fn get_listing(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProviderListing>, RepositoryError> {
        let row = sqlx::query(
            "SELECT p.*, u.full_name FROM providers p
             JOIN users u ON u.id = p.user_id
             WHERE p.user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| listing_from_row(&row)).transpose()
    }

    async fn list_listings(&self) -> Result<Vec<ProviderListing>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT p.*, u.full_name FROM providers p
             JOIN users u ON u.id = p.user_id
             ORDER BY p.joined_at ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut listings = Vec::with_capacity(rows.len());
        for row in &rows {
            listings.push(listing_from_row(row)?);
        }
        Ok(listings)
    }

    async fn update_rating(
        &self,
        user_id: &UserId,
        rating: f64,
        review_count: u32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE providers SET rating = ?, review_count = ? WHERE user_id = ?")
            .bind(rating)
            .bind(review_count as i64)
            .bind(user_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM providers")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}
