//! Provider profile types.
//!
//! `ProviderDetails` is keyed by the owning user's id -- becoming a provider
//! attaches a details record to an existing account, it never creates a
//! second identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::user::UserId;

/// Geographic point for map placement. Precision is display-grade only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Service-side profile attached to a user account.
///
/// `rating` and `review_count` are aggregates owned by the review engine;
/// nothing else writes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDetails {
    /// Matches the owning `UserProfile` id.
    pub user_id: UserId,
    pub bio: String,
    /// Hourly rate in whole rupees.
    pub hourly_rate: i64,
    pub verified: bool,
    /// Category ids this provider serves. Never empty.
    pub categories: Vec<String>,
    /// Mean review rating, 0.0 until the first review lands.
    pub rating: f64,
    pub review_count: u32,
    /// Freeform "area, city" string, e.g. "Gulberg, Lahore".
    pub location: String,
    pub coordinates: GeoPoint,
    pub experience_years: u32,
    pub service_radius_km: u32,
    pub images: Vec<String>,
    pub joined_at: DateTime<Utc>,
}

impl ProviderDetails {
    /// Check the structural constraints a details record must satisfy before
    /// it can enter the directory.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.categories.is_empty() {
            return Err(ValidationError::new("provider must serve at least one category"));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(ValidationError::new("rating must be within 0-5"));
        }
        Ok(())
    }
}

/// A provider as the directory ranks and returns it: the details record
/// joined with the owning account's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderListing {
    pub full_name: String,
    #[serde(flatten)]
    pub details: ProviderDetails,
}

impl ProviderListing {
    pub fn user_id(&self) -> UserId {
        self.details.user_id
    }
}
