//! Pure filtering and scoring functions for the provider directory.
//!
//! Scoring is a weighted blend of rating and review volume, with a flat
//! boost when the provider's location matches the query's location hint.
//! All matching is case-insensitive substring matching.

use std::cmp::Ordering;

use karigar_types::provider::ProviderListing;

use super::SearchCriteria;

const RATING_WEIGHT: f64 = 0.7;
const REVIEW_WEIGHT: f64 = 0.3;
/// Flat bonus when the provider's location contains the query's
/// location hint or term.
pub const LOCATION_BOOST: f64 = 3.0;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether a listing survives the conjunctive filter.
pub fn matches(listing: &ProviderListing, criteria: &SearchCriteria) -> bool {
    if let Some(category) = criteria.category() {
        if !listing.details.categories.iter().any(|c| c == category) {
            return false;
        }
    }
    if let Some(city) = criteria.city() {
        if !contains_ci(&listing.details.location, city) {
            return false;
        }
    }
    if let Some(term) = criteria.term() {
        let matched = contains_ci(&listing.full_name, term)
            || contains_ci(&listing.details.bio, term)
            || listing.details.categories.iter().any(|c| contains_ci(c, term))
            || contains_ci(&listing.details.location, term);
        if !matched {
            return false;
        }
    }
    true
}

/// Base relevance score: `rating * 0.7 + log10(review_count + 1) * 0.3`.
pub fn relevance_score(listing: &ProviderListing) -> f64 {
    listing.details.rating * RATING_WEIGHT
        + (listing.details.review_count as f64 + 1.0).log10() * REVIEW_WEIGHT
}

/// Base score plus the location boost for the given hint, if it applies.
pub fn boosted_score(listing: &ProviderListing, boost_hint: Option<&str>) -> f64 {
    let mut score = relevance_score(listing);
    if let Some(hint) = boost_hint {
        if contains_ci(&listing.details.location, hint) {
            score += LOCATION_BOOST;
        }
    }
    score
}

/// Filter and order a directory snapshot.
///
/// The sort is stable and descending: listings with equal scores keep the
/// relative order they had in the filtered input.
pub fn rank(listings: Vec<ProviderListing>, criteria: &SearchCriteria) -> Vec<ProviderListing> {
    let boost_hint = criteria.boost_hint();
    let mut scored: Vec<(f64, ProviderListing)> = listings
        .into_iter()
        .filter(|l| matches(l, criteria))
        .map(|l| (boosted_score(&l, boost_hint), l))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(_, l)| l).collect()
}
