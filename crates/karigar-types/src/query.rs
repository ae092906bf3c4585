//! Query interpreter contract types.
//!
//! The interpreter maps free text ("my ac is leaking in gulberg") to a
//! structured hint. How the mapping is produced is the collaborator's
//! business; the core only relies on this shape and tolerates degraded
//! output (all `None` / echo of the input).

use serde::{Deserialize, Serialize};

/// Structured interpretation of a free-text service request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    /// Best-matching category id, if any keyword scored.
    pub category_id: Option<String>,
    /// Cleaned-up term to feed the directory search.
    pub suggested_term: String,
    /// City or neighbourhood detected in the query, if any.
    pub detected_location: Option<String>,
}

impl QueryIntent {
    /// The degraded interpretation: no category, no location, the raw query
    /// echoed back as the search term.
    pub fn echo(free_text: &str) -> Self {
        Self {
            category_id: None,
            suggested_term: free_text.to_string(),
            detected_location: None,
        }
    }
}
