//! Directory seeding.
//!
//! Populates an empty database with the launch directory: six providers
//! across the service categories plus a handful of reviews, so a fresh
//! install has something to search. Seeding is idempotent -- a non-empty
//! directory is left untouched.

use chrono::{Duration, Utc};
use karigar_core::repository::provider::ProviderRepository;
use karigar_core::repository::review::ReviewRepository;
use karigar_core::repository::user::UserRepository;
use karigar_types::error::RepositoryError;
use karigar_types::provider::{GeoPoint, ProviderDetails};
use karigar_types::review::{Review, ReviewId};
use karigar_types::user::{Role, UserId, UserProfile};
use tracing::{debug, info};

struct SeedProvider {
    full_name: &'static str,
    email: &'static str,
    bio: &'static str,
    hourly_rate: i64,
    verified: bool,
    category: &'static str,
    rating: f64,
    review_count: u32,
    location: &'static str,
    coordinates: (f64, f64),
    experience_years: u32,
    service_radius_km: u32,
    joined_days_ago: i64,
}

const SEED_PROVIDERS: &[SeedProvider] = &[
    SeedProvider {
        full_name: "Ahmed Ali",
        email: "ahmed.ali@karigar.pk",
        bio: "Certified plumber with 10 years of experience in residential and commercial plumbing. Expert in leak detection.",
        hourly_rate: 1500,
        verified: true,
        category: "plumbing",
        rating: 4.8,
        review_count: 42,
        location: "Gulberg, Lahore",
        coordinates: (31.5204, 74.3587),
        experience_years: 10,
        service_radius_km: 10,
        joined_days_ago: 1300,
    },
    SeedProvider {
        full_name: "Fast Fix Electrics (Bilal)",
        email: "bilal@karigar.pk",
        bio: "Professional electrician available for emergency repairs. Specializing in UPS installation and wiring.",
        hourly_rate: 2000,
        verified: true,
        category: "electrical",
        rating: 4.5,
        review_count: 156,
        location: "Clifton, Karachi",
        coordinates: (24.8270, 67.0251),
        experience_years: 5,
        service_radius_km: 15,
        joined_days_ago: 1240,
    },
    SeedProvider {
        full_name: "Sana Housekeeping",
        email: "sana@karigar.pk",
        bio: "Reliable and trustworthy cleaning services for your home. We bring our own supplies.",
        hourly_rate: 1000,
        verified: false,
        category: "cleaning",
        rating: 4.9,
        review_count: 20,
        location: "F-10, Islamabad",
        coordinates: (33.6938, 73.0169),
        experience_years: 3,
        service_radius_km: 5,
        joined_days_ago: 800,
    },
    SeedProvider {
        full_name: "Cool Breeze AC",
        email: "coolbreeze@karigar.pk",
        bio: "Expert AC technicians for Split and Window ACs. Summer special rates available.",
        hourly_rate: 2500,
        verified: true,
        category: "ac_repair",
        rating: 4.6,
        review_count: 89,
        location: "DHA Phase 6, Lahore",
        coordinates: (31.4725, 74.4564),
        experience_years: 8,
        service_radius_km: 20,
        joined_days_ago: 1380,
    },
    SeedProvider {
        full_name: "Master Mechanic Junaid",
        email: "junaid@karigar.pk",
        bio: "On-spot car repair and diagnostics. I come to you.",
        hourly_rate: 3000,
        verified: true,
        category: "auto_mechanic",
        rating: 4.7,
        review_count: 33,
        location: "Bahria Town, Rawalpindi",
        coordinates: (33.5253, 73.1343),
        experience_years: 12,
        service_radius_km: 25,
        joined_days_ago: 1820,
    },
    SeedProvider {
        full_name: "Gulberg AC Expert",
        email: "gulberg.ac@karigar.pk",
        bio: "Specialist in Inverter ACs. Located right in Main Market Gulberg.",
        hourly_rate: 1800,
        verified: true,
        category: "ac_repair",
        rating: 4.9,
        review_count: 12,
        location: "Gulberg, Lahore",
        coordinates: (31.5204, 74.3587),
        experience_years: 4,
        service_radius_km: 8,
        joined_days_ago: 580,
    },
];

/// Seed reviews keyed by index into `SEED_PROVIDERS`.
const SEED_REVIEWS: &[(usize, &str, u8, &str)] = &[
    (0, "Hassan R.", 5, "Excellent work, fixed the leak in minutes."),
    (0, "Fatima Z.", 4, "Good work but arrived slightly late."),
    (1, "Usman K.", 5, "Very professional, knew exactly what was wrong with the UPS."),
];

/// Populate an empty directory with the launch providers.
///
/// Returns the seeded provider ids in `SEED_PROVIDERS` order, or an empty
/// vec when the directory already has entries.
pub async fn seed_directory<U, P, R>(
    users: &U,
    providers: &P,
    reviews: &R,
) -> Result<Vec<UserId>, RepositoryError>
where
    U: UserRepository,
    P: ProviderRepository,
    R: ReviewRepository,
{
    if providers.count().await? > 0 {
        debug!("directory already populated, skipping seed");
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity(SEED_PROVIDERS.len());
    for seed in SEED_PROVIDERS {
        let mut user = UserProfile::new(seed.email, seed.full_name);
        user.is_provider = true;
        user.current_role = Role::Provider;
        user.location = Some(seed.location.to_string());
        users.save(&user).await?;

        providers
            .save_details(&ProviderDetails {
                user_id: user.id,
                bio: seed.bio.to_string(),
                hourly_rate: seed.hourly_rate,
                verified: seed.verified,
                categories: vec![seed.category.to_string()],
                rating: seed.rating,
                review_count: seed.review_count,
                location: seed.location.to_string(),
                coordinates: GeoPoint {
                    lat: seed.coordinates.0,
                    lng: seed.coordinates.1,
                },
                experience_years: seed.experience_years,
                service_radius_km: seed.service_radius_km,
                images: vec![],
                joined_at: Utc::now() - Duration::days(seed.joined_days_ago),
            })
            .await?;

        ids.push(user.id);
    }

    for (index, reviewer, rating, comment) in SEED_REVIEWS {
        reviews
            .append(&Review {
                id: ReviewId::new(),
                provider_id: ids[*index],
                reviewer_name: (*reviewer).to_string(),
                rating: *rating,
                comment: (*comment).to_string(),
                date: Utc::now() - Duration::days(90),
            })
            .await?;
    }

    info!(providers = ids.len(), "directory seeded");
    Ok(ids)
}
