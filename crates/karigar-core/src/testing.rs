//! In-memory repository implementations for core service tests.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use karigar_types::booking::{Booking, BookingId, BookingStatus};
use karigar_types::error::RepositoryError;
use karigar_types::message::Message;
use karigar_types::provider::{GeoPoint, ProviderDetails, ProviderListing};
use karigar_types::review::Review;
use karigar_types::user::{Role, UserId, UserProfile};

use crate::repository::booking::BookingRepository;
use crate::repository::message::MessageRepository;
use crate::repository::provider::ProviderRepository;
use crate::repository::review::ReviewRepository;
use crate::repository::user::UserRepository;

#[derive(Default)]
struct Inner {
    users: Mutex<Vec<UserProfile>>,
    providers: Mutex<Vec<ProviderDetails>>,
    bookings: Mutex<Vec<Booking>>,
    messages: Mutex<Vec<Message>>,
    reviews: Mutex<Vec<Review>>,
}

/// Shared in-memory store implementing every repository port.
///
/// Cloning shares the underlying state, so one store can back several
/// services in a test.
#[derive(Clone, Default)]
pub(crate) struct MemStore {
    inner: Arc<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user and return its id.
    pub fn add_user(&self, email: &str, full_name: &str) -> UserId {
        let user = UserProfile::new(email, full_name);
        let id = user.id;
        self.inner.users.lock().unwrap().push(user);
        id
    }

    /// Insert a user with an attached provider profile; returns the user id.
    pub fn add_provider(
        &self,
        full_name: &str,
        category: &str,
        location: &str,
        hourly_rate: i64,
        rating: f64,
        review_count: u32,
    ) -> UserId {
        let email = format!("{}@example.com", full_name.to_lowercase().replace(' ', "."));
        let mut user = UserProfile::new(email, full_name);
        user.is_provider = true;
        user.current_role = Role::Provider;
        let id = user.id;
        self.inner.users.lock().unwrap().push(user);
        self.inner.providers.lock().unwrap().push(ProviderDetails {
            user_id: id,
            bio: format!("{full_name} at your service."),
            hourly_rate,
            verified: true,
            categories: vec![category.to_string()],
            rating,
            review_count,
            location: location.to_string(),
            coordinates: GeoPoint { lat: 0.0, lng: 0.0 },
            experience_years: 5,
            service_radius_km: 10,
            images: vec![],
            joined_at: Utc::now(),
        });
        id
    }

    fn listing_for(&self, details: &ProviderDetails) -> Option<ProviderListing> {
        let users = self.inner.users.lock().unwrap();
        users
            .iter()
            .find(|u| u.id == details.user_id)
            .map(|u| ProviderListing {
                full_name: u.full_name.clone(),
                details: details.clone(),
            })
    }
}

impl UserRepository for MemStore {
    async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, RepositoryError> {
        let users = self.inner.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let users = self.inner.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn save(&self, user: &UserProfile) -> Result<(), RepositoryError> {
        let mut users = self.inner.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(())
    }
}

impl ProviderRepository for MemStore {
    async fn save_details(&self, details: &ProviderDetails) -> Result<(), RepositoryError> {
        let mut providers = self.inner.providers.lock().unwrap();
        match providers.iter_mut().find(|p| p.user_id == details.user_id) {
            Some(existing) => *existing = details.clone(),
            None => providers.push(details.clone()),
        }
        Ok(())
    }

    async fn get_details(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProviderDetails>, RepositoryError> {
        let providers = self.inner.providers.lock().unwrap();
        Ok(providers.iter().find(|p| p.user_id == *user_id).cloned())
    }

    async fn get_listing(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProviderListing>, RepositoryError> {
        let details = {
            let providers = self.inner.providers.lock().unwrap();
            providers.iter().find(|p| p.user_id == *user_id).cloned()
        };
        Ok(details.and_then(|d| self.listing_for(&d)))
    }

    async fn list_listings(&self) -> Result<Vec<ProviderListing>, RepositoryError> {
        let details: Vec<ProviderDetails> = self.inner.providers.lock().unwrap().clone();
        Ok(details.iter().filter_map(|d| self.listing_for(d)).collect())
    }

    async fn update_rating(
        &self,
        user_id: &UserId,
        rating: f64,
        review_count: u32,
    ) -> Result<(), RepositoryError> {
        let mut providers = self.inner.providers.lock().unwrap();
        match providers.iter_mut().find(|p| p.user_id == *user_id) {
            Some(p) => {
                p.rating = rating;
                p.review_count = review_count;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.inner.providers.lock().unwrap().len() as u64)
    }
}

impl BookingRepository for MemStore {
    async fn create(&self, booking: &Booking) -> Result<(), RepositoryError> {
        self.inner.bookings.lock().unwrap().push(booking.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        let bookings = self.inner.bookings.lock().unwrap();
        Ok(bookings.iter().find(|b| b.id == *id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        let mut bookings = self.inner.bookings.lock().unwrap().clone();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        role: Role,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let mut bookings: Vec<Booking> = self
            .inner
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| match role {
                Role::Customer => b.customer_id == *user_id,
                Role::Provider => b.provider_id == *user_id,
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn update_status(
        &self,
        id: &BookingId,
        new_status: BookingStatus,
        expected_version: i64,
    ) -> Result<Booking, RepositoryError> {
        let mut bookings = self.inner.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        if booking.version != expected_version {
            return Err(RepositoryError::Conflict(format!(
                "expected version {expected_version}, found {}",
                booking.version
            )));
        }
        booking.status = new_status;
        booking.version += 1;
        Ok(booking.clone())
    }
}

impl MessageRepository for MemStore {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        self.inner.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn list_for_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let mut messages: Vec<Message> = self
            .inner
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.booking_id == *booking_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(messages)
    }

    async fn mark_read(
        &self,
        booking_id: &BookingId,
        reader: &UserId,
    ) -> Result<u64, RepositoryError> {
        let mut messages = self.inner.messages.lock().unwrap();
        let mut flipped = 0;
        for m in messages
            .iter_mut()
            .filter(|m| m.booking_id == *booking_id && !m.sender.is_user(*reader) && !m.is_read)
        {
            m.is_read = true;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn unread_count(
        &self,
        booking_id: &BookingId,
        user: &UserId,
    ) -> Result<u32, RepositoryError> {
        let messages = self.inner.messages.lock().unwrap();
        Ok(messages
            .iter()
            .filter(|m| m.booking_id == *booking_id && !m.sender.is_user(*user) && !m.is_read)
            .count() as u32)
    }
}

impl ReviewRepository for MemStore {
    async fn append(&self, review: &Review) -> Result<(), RepositoryError> {
        self.inner.reviews.lock().unwrap().push(review.clone());
        Ok(())
    }

    async fn list_for_provider(
        &self,
        provider_id: &UserId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let mut reviews: Vec<Review> = self
            .inner
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.provider_id == *provider_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(reviews)
    }
}
