//! Directory search and ranking engine.
//!
//! Merges the provider directory, filters it conjunctively, and orders the
//! survivors by relevance. Pure apart from the repository read: the same
//! snapshot and criteria always produce the same ordering.

pub mod ranking;

use karigar_types::error::DirectoryError;
use karigar_types::provider::ProviderListing;
use karigar_types::query::QueryIntent;
use tracing::warn;

use crate::interpreter::QueryInterpreter;
use crate::repository::provider::ProviderRepository;

/// Filter inputs for a directory search. All fields optional; blank strings
/// are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    /// Exact category id ("ac_repair").
    pub category: Option<String>,
    /// Case-insensitive substring match against the provider location.
    pub city: Option<String>,
    /// Case-insensitive substring match across name, bio, categories,
    /// and location.
    pub term: Option<String>,
    /// Detected neighbourhood/city used for the ranking boost. Falls back
    /// to `term` when absent.
    pub location_hint: Option<String>,
}

impl SearchCriteria {
    fn non_blank(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn category(&self) -> Option<&str> {
        Self::non_blank(&self.category)
    }

    pub fn city(&self) -> Option<&str> {
        Self::non_blank(&self.city)
    }

    pub fn term(&self) -> Option<&str> {
        Self::non_blank(&self.term)
    }

    /// The string the location boost is checked against.
    pub fn boost_hint(&self) -> Option<&str> {
        Self::non_blank(&self.location_hint).or_else(|| self.term())
    }
}

/// Result of a free-text search: what the interpreter made of the query,
/// and the ranked listings it led to.
#[derive(Debug, Clone)]
pub struct FreeTextSearch {
    pub intent: QueryIntent,
    pub results: Vec<ProviderListing>,
}

/// Search and ranking over the provider directory.
///
/// Generic over `ProviderRepository` and `QueryInterpreter` to maintain
/// clean architecture -- karigar-core never depends on karigar-infra.
pub struct DirectoryService<P: ProviderRepository, Q: QueryInterpreter> {
    providers: P,
    interpreter: Q,
}

impl<P: ProviderRepository, Q: QueryInterpreter> DirectoryService<P, Q> {
    pub fn new(providers: P, interpreter: Q) -> Self {
        Self {
            providers,
            interpreter,
        }
    }

    /// Filter and rank the current directory snapshot.
    ///
    /// Returns the full ordered result set; there is no pagination.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<ProviderListing>, DirectoryError> {
        let listings = self
            .providers
            .list_listings()
            .await
            .map_err(|e| DirectoryError::Storage(e.to_string()))?;
        Ok(ranking::rank(listings, criteria))
    }

    /// Interpret raw free text and search with the resulting hints.
    ///
    /// Interpreter failure degrades to a term-only search of the raw text;
    /// it never surfaces as an error.
    pub async fn search_free_text(
        &self,
        free_text: &str,
    ) -> Result<FreeTextSearch, DirectoryError> {
        let intent = match self.interpreter.interpret(free_text).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!(error = %e, "query interpreter unavailable, echoing raw query");
                QueryIntent::echo(free_text)
            }
        };

        let criteria = SearchCriteria {
            category: intent.category_id.clone(),
            city: None,
            term: if intent.suggested_term.trim().is_empty() {
                Some(free_text.to_string())
            } else {
                Some(intent.suggested_term.clone())
            },
            location_hint: intent.detected_location.clone(),
        };

        let results = self.search(&criteria).await?;
        Ok(FreeTextSearch { intent, results })
    }
}
