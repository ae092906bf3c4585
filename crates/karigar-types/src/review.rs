//! Review records attached to providers after completed bookings.
//!
//! Reviews are append-only and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::user::UserId;

/// Unique identifier for a review, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub Uuid);

impl ReviewId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReviewId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A rating plus comment left for a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub provider_id: UserId,
    /// Reviewer display name, cached at submission.
    pub reviewer_name: String,
    /// Whole-star rating, 1-5.
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// Validate a star rating before it enters a review.
pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::new(format!(
            "rating must be within 1-5, got {rating}"
        )));
    }
    Ok(())
}
