//! Review engine.
//!
//! Attaches ratings to providers after completed bookings and owns the
//! provider's rating aggregates: `review_count` and the running mean move
//! through this service only.

use chrono::Utc;
use karigar_types::booking::BookingStatus;
use karigar_types::booking::BookingId;
use karigar_types::error::ReviewError;
use karigar_types::review::{validate_rating, Review, ReviewId};
use karigar_types::user::{UserId, UserProfile};
use tracing::{info, warn};

use crate::repository::booking::BookingRepository;
use crate::repository::provider::ProviderRepository;
use crate::repository::review::ReviewRepository;

/// Review submission and aggregate maintenance.
pub struct ReviewService<R: ReviewRepository, B: BookingRepository, P: ProviderRepository> {
    reviews: R,
    bookings: B,
    providers: P,
}

impl<R: ReviewRepository, B: BookingRepository, P: ProviderRepository> ReviewService<R, B, P> {
    pub fn new(reviews: R, bookings: B, providers: P) -> Self {
        Self {
            reviews,
            bookings,
            providers,
        }
    }

    /// Attach a review to the provider of a completed booking.
    ///
    /// The booking must exist, be `COMPLETED`, and belong to `reviewer` as
    /// its customer; the rating must be a whole star within 1-5. On success
    /// the review is appended and folded into the provider's aggregates.
    pub async fn add_review(
        &self,
        booking_id: &BookingId,
        reviewer: &UserProfile,
        rating: u8,
        comment: impl Into<String>,
    ) -> Result<Review, ReviewError> {
        validate_rating(rating)?;

        let booking = self
            .bookings
            .get_by_id(booking_id)
            .await
            .map_err(|e| ReviewError::Storage(e.to_string()))?
            .ok_or(ReviewError::BookingNotFound)?;

        if booking.status != BookingStatus::Completed {
            return Err(ReviewError::NotCompleted);
        }
        if booking.customer_id != reviewer.id {
            return Err(ReviewError::NotBookingCustomer);
        }

        let review = Review {
            id: ReviewId::new(),
            provider_id: booking.provider_id,
            reviewer_name: reviewer.full_name.clone(),
            rating,
            comment: comment.into(),
            date: Utc::now(),
        };
        self.reviews
            .append(&review)
            .await
            .map_err(|e| ReviewError::Storage(e.to_string()))?;

        self.fold_into_aggregates(&booking.provider_id, rating).await?;

        info!(%booking_id, provider = %booking.provider_id, rating, "Review added");
        Ok(review)
    }

    /// List a provider's reviews, newest first.
    pub async fn reviews_for(&self, provider_id: &UserId) -> Result<Vec<Review>, ReviewError> {
        self.reviews
            .list_for_provider(provider_id)
            .await
            .map_err(|e| ReviewError::Storage(e.to_string()))
    }

    /// Advance the provider's running mean and count by one review.
    async fn fold_into_aggregates(
        &self,
        provider_id: &UserId,
        rating: u8,
    ) -> Result<(), ReviewError> {
        let Some(details) = self
            .providers
            .get_details(provider_id)
            .await
            .map_err(|e| ReviewError::Storage(e.to_string()))?
        else {
            // The review still stands; only the directory aggregate is lost.
            warn!(%provider_id, "reviewed provider has no directory record");
            return Ok(());
        };

        let new_count = details.review_count + 1;
        let new_rating =
            (details.rating * details.review_count as f64 + rating as f64) / new_count as f64;
        self.providers
            .update_rating(provider_id, new_rating, new_count)
            .await
            .map_err(|e| ReviewError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingService;
    use crate::repository::provider::ProviderRepository as _;
    use crate::testing::MemStore;
    use karigar_types::booking::Booking;
    use karigar_types::user::Actor;

    struct Fixture {
        store: MemStore,
        booking: Booking,
        customer: UserProfile,
        provider_id: UserId,
    }

    async fn completed_booking() -> Fixture {
        let store = MemStore::new();
        let provider_id = store.add_provider("Sana Housekeeping", "cleaning", "F-10, Islamabad", 1000, 4.0, 1);
        let customer = UserProfile::new("zara@example.com", "Zara Khan");
        let bookings = BookingService::new(store.clone(), store.clone(), store.clone());
        let booking = bookings
            .create_booking(&customer, provider_id, Utc::now(), None)
            .await
            .unwrap();
        let provider = Actor::provider(provider_id);
        for status in [
            BookingStatus::Accepted,
            BookingStatus::InProgress,
            BookingStatus::Completed,
        ] {
            bookings.update_status(&booking.id, status, provider).await.unwrap();
        }
        Fixture {
            store,
            booking,
            customer,
            provider_id,
        }
    }

    fn service(store: &MemStore) -> ReviewService<MemStore, MemStore, MemStore> {
        ReviewService::new(store.clone(), store.clone(), store.clone())
    }

    #[tokio::test]
    async fn test_review_lands_and_updates_aggregates() {
        let fx = completed_booking().await;
        let svc = service(&fx.store);

        let review = svc
            .add_review(&fx.booking.id, &fx.customer, 5, "Spotless work.")
            .await
            .unwrap();
        assert_eq!(review.provider_id, fx.provider_id);
        assert_eq!(review.reviewer_name, "Zara Khan");

        // Mean moves from 4.0 (1 review) to 4.5 (2 reviews).
        let details = fx.store.get_details(&fx.provider_id).await.unwrap().unwrap();
        assert_eq!(details.review_count, 2);
        assert!((details.rating - 4.5).abs() < 1e-9);

        let listed = svc.reviews_for(&fx.provider_id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_booking_rejected() {
        let fx = completed_booking().await;
        let err = service(&fx.store)
            .add_review(&BookingId::new(), &fx.customer, 4, "?")
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::BookingNotFound));
    }

    #[tokio::test]
    async fn test_uncompleted_booking_rejected() {
        let store = MemStore::new();
        let provider_id = store.add_provider("Ahmed Ali", "plumbing", "Gulberg, Lahore", 1500, 4.8, 42);
        let customer = UserProfile::new("zara@example.com", "Zara Khan");
        let booking = BookingService::new(store.clone(), store.clone(), store.clone())
            .create_booking(&customer, provider_id, Utc::now(), None)
            .await
            .unwrap();

        let err = service(&store)
            .add_review(&booking.id, &customer, 4, "too early")
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::NotCompleted));
    }

    #[tokio::test]
    async fn test_non_customer_rejected() {
        let fx = completed_booking().await;
        let stranger = UserProfile::new("omar@example.com", "Omar Siddiqui");
        let err = service(&fx.store)
            .add_review(&fx.booking.id, &stranger, 4, "nice")
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::NotBookingCustomer));
    }

    #[tokio::test]
    async fn test_out_of_range_rating_rejected() {
        let fx = completed_booking().await;
        let svc = service(&fx.store);
        for rating in [0, 6] {
            let err = svc
                .add_review(&fx.booking.id, &fx.customer, rating, "")
                .await
                .unwrap_err();
            assert!(matches!(err, ReviewError::Validation(_)));
        }
    }
}
