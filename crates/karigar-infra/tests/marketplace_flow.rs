//! End-to-end marketplace flow over SQLite: seed the directory, search it,
//! book a provider, drive the lifecycle to completion, exchange messages,
//! and leave a review.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use karigar_core::booking::{pricing::Quote, BookingService};
use karigar_core::directory::{DirectoryService, SearchCriteria};
use karigar_core::messaging::{poller, MessagingService};
use karigar_core::repository::provider::ProviderRepository;
use karigar_core::repository::user::UserRepository;
use karigar_core::review::ReviewService;
use karigar_core::session::SessionManager;
use karigar_infra::interpreter::KeywordInterpreter;
use karigar_infra::seed::seed_directory;
use karigar_infra::session::FileSessionCache;
use karigar_infra::sqlite::booking::SqliteBookingRepository;
use karigar_infra::sqlite::message::SqliteMessageRepository;
use karigar_infra::sqlite::pool::DatabasePool;
use karigar_infra::sqlite::provider::SqliteProviderRepository;
use karigar_infra::sqlite::review::SqliteReviewRepository;
use karigar_infra::sqlite::user::SqliteUserRepository;
use karigar_types::booking::BookingStatus;
use karigar_types::user::{Actor, Role, UserId, UserProfile};

async fn test_pool() -> DatabasePool {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    std::mem::forget(dir);
    DatabasePool::new(&url).await.unwrap()
}

async fn seeded(pool: &DatabasePool) -> Vec<UserId> {
    let users = SqliteUserRepository::new(pool.clone());
    let providers = SqliteProviderRepository::new(pool.clone());
    let reviews = SqliteReviewRepository::new(pool.clone());
    seed_directory(&users, &providers, &reviews).await.unwrap()
}

#[tokio::test]
async fn test_search_seeded_directory_by_category_and_city() {
    let pool = test_pool().await;
    seeded(&pool).await;

    let directory = DirectoryService::new(
        SqliteProviderRepository::new(pool.clone()),
        KeywordInterpreter,
    );
    let results = directory
        .search(&SearchCriteria {
            category: Some("ac_repair".to_string()),
            city: Some("Lahore".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let names: Vec<&str> = results.iter().map(|l| l.full_name.as_str()).collect();
    // Both AC providers sit in Lahore; the score formula puts the heavily
    // reviewed one first: 4.6*0.7 + log10(90)*0.3 > 4.9*0.7 + log10(13)*0.3.
    assert_eq!(names, ["Cool Breeze AC", "Gulberg AC Expert"]);
}

#[tokio::test]
async fn test_free_text_query_routes_through_interpreter() {
    let pool = test_pool().await;
    seeded(&pool).await;

    let directory = DirectoryService::new(
        SqliteProviderRepository::new(pool.clone()),
        KeywordInterpreter,
    );
    let search = directory
        .search_free_text("I need someone to fix my AC in Gulberg")
        .await
        .unwrap();

    assert_eq!(search.intent.category_id.as_deref(), Some("ac_repair"));
    assert_eq!(search.intent.detected_location.as_deref(), Some("Gulberg"));
    // The Gulberg specialist outranks the better-reviewed DHA shop thanks to
    // the +3.0 location boost.
    assert_eq!(search.results[0].full_name, "Gulberg AC Expert");
}

#[tokio::test]
async fn test_full_booking_lifecycle_with_messages_and_review() {
    let pool = test_pool().await;
    let ids = seeded(&pool).await;
    let ahmed = ids[0]; // plumber, 1500/hr

    let users = SqliteUserRepository::new(pool.clone());
    let customer = UserProfile::new("zara@example.com", "Zara Khan");
    users.save(&customer).await.unwrap();

    let bookings = BookingService::new(
        SqliteBookingRepository::new(pool.clone()),
        SqliteProviderRepository::new(pool.clone()),
        SqliteMessageRepository::new(pool.clone()),
    );
    let messaging = MessagingService::new(
        SqliteMessageRepository::new(pool.clone()),
        SqliteBookingRepository::new(pool.clone()),
    );

    // Book: price cached from the directory, status PENDING, thread seeded.
    let booking = bookings
        .create_booking(&customer, ahmed, Utc::now(), None)
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_price, 1500);
    assert_eq!(booking.provider_name, "Ahmed Ali");

    let thread = messaging.thread(&booking.id).await.unwrap();
    assert_eq!(thread.len(), 1, "creation synthesizes exactly one system message");

    // Invoice and in-app summary share the same quote.
    let quote = bookings.quote(&booking.id).await.unwrap();
    assert_eq!(quote, Quote::for_price(1500));
    assert_eq!(quote.platform_fee, 150);
    assert_eq!(quote.total, 1650);

    // Provider drives the happy path; each hop lands in the thread.
    let provider = Actor::provider(ahmed);
    for status in [
        BookingStatus::Accepted,
        BookingStatus::InProgress,
        BookingStatus::Completed,
    ] {
        bookings.update_status(&booking.id, status, provider).await.unwrap();
    }
    let thread = messaging.thread(&booking.id).await.unwrap();
    assert_eq!(thread.len(), 4);
    assert_eq!(
        thread.last().unwrap().content,
        "Booking status updated to: COMPLETED"
    );

    // Unread bookkeeping across the two parties.
    messaging.mark_read(&booking.id, customer.id).await.unwrap();
    messaging
        .send(&booking.id, ahmed, "Thanks for having me!")
        .await
        .unwrap();
    assert_eq!(messaging.unread_count(&booking.id, customer.id).await.unwrap(), 1);
    messaging.mark_read(&booking.id, customer.id).await.unwrap();
    assert_eq!(messaging.unread_count(&booking.id, customer.id).await.unwrap(), 0);

    // Review the completed job; aggregates fold in the new rating.
    let reviews = ReviewService::new(
        SqliteReviewRepository::new(pool.clone()),
        SqliteBookingRepository::new(pool.clone()),
        SqliteProviderRepository::new(pool.clone()),
    );
    reviews
        .add_review(&booking.id, &customer, 5, "Fixed the leak in minutes.")
        .await
        .unwrap();

    let providers = SqliteProviderRepository::new(pool.clone());
    let details = providers.get_details(&ahmed).await.unwrap().unwrap();
    assert_eq!(details.review_count, 43);
    assert!(details.rating > 4.8);
}

#[tokio::test]
async fn test_conversation_poller_over_sqlite() {
    let pool = test_pool().await;
    let ids = seeded(&pool).await;

    let users = SqliteUserRepository::new(pool.clone());
    let customer = UserProfile::new("zara@example.com", "Zara Khan");
    users.save(&customer).await.unwrap();

    let bookings = BookingService::new(
        SqliteBookingRepository::new(pool.clone()),
        SqliteProviderRepository::new(pool.clone()),
        SqliteMessageRepository::new(pool.clone()),
    );
    let booking = bookings
        .create_booking(&customer, ids[0], Utc::now(), None)
        .await
        .unwrap();

    let messaging = Arc::new(MessagingService::new(
        SqliteMessageRepository::new(pool.clone()),
        SqliteBookingRepository::new(pool.clone()),
    ));
    messaging
        .send(&booking.id, ids[0], "Reached your street.")
        .await
        .unwrap();

    let watch = poller::watch_conversation(
        messaging.clone(),
        booking.id,
        customer.id,
        Role::Customer,
        Duration::from_millis(20),
    );
    let mut rx = watch.snapshots();
    rx.changed().await.unwrap();
    let snapshot = rx.borrow().clone();

    assert_eq!(snapshot.thread.len(), 2);
    assert_eq!(snapshot.conversations.len(), 1);
    assert_eq!(snapshot.conversations[0].unread, 0, "poll marks the open thread read");
    watch.stop().await;
}

#[tokio::test]
async fn test_session_restores_user_from_cached_email() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();

    let users = SqliteUserRepository::new(pool.clone());
    let user = UserProfile::new("zara@example.com", "Zara Khan");
    users.save(&user).await.unwrap();

    let sessions = SessionManager::new(FileSessionCache::new(dir.path()), users);
    sessions.login(&user).await.unwrap();

    let restored = sessions.restore().await.unwrap().unwrap();
    assert_eq!(restored.id, user.id);
}
