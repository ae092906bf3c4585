//! Keyword-scoring query interpreter.
//!
//! Implements the `QueryInterpreter` port from `karigar-core` without any
//! external model: categories are scored by keyword hits, locations are
//! detected against the static city and neighbourhood lists, and the search
//! term is the query with locations and stop words removed.

use karigar_core::interpreter::QueryInterpreter;
use karigar_types::catalog::{self, CATEGORIES, CITIES, COMMON_AREAS};
use karigar_types::error::InterpreterError;
use karigar_types::query::QueryIntent;
use tracing::debug;

/// Words stripped from the query when deriving the search term.
const STOP_WORDS: &[&str] = &[
    "in", "at", "near", "fix", "my", "i", "want", "need", "someone", "to", "please",
];

/// Keyword-based implementation of `QueryInterpreter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordInterpreter;

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn detect_location(query: &str) -> Option<String> {
    if let Some(city) = CITIES.iter().find(|c| query.contains(&c.to_lowercase())) {
        return Some((*city).to_string());
    }
    COMMON_AREAS
        .iter()
        .find(|area| query.contains(*area))
        .map(|area| capitalize(area))
}

fn detect_category(query: &str) -> Option<&'static catalog::Category> {
    let mut best = None;
    let mut max_score = 0;
    for category in CATEGORIES {
        let score = category
            .keywords
            .iter()
            .filter(|keyword| query.contains(*keyword))
            .count();
        if score > max_score {
            max_score = score;
            best = Some(category);
        }
    }
    best
}

fn clean_term(free_text: &str, location: Option<&str>) -> String {
    let location_lower = location.map(str::to_lowercase);
    free_text
        .split_whitespace()
        .filter(|word| {
            let bare: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect::<String>()
                .to_lowercase();
            !bare.is_empty()
                && !STOP_WORDS.contains(&bare.as_str())
                && location_lower.as_deref() != Some(bare.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl QueryInterpreter for KeywordInterpreter {
    async fn interpret(&self, free_text: &str) -> Result<QueryIntent, InterpreterError> {
        let query = free_text.to_lowercase();

        let detected_location = detect_location(&query);
        let category = detect_category(&query);

        let clean = clean_term(free_text, detected_location.as_deref());
        let suggested_term = if !clean.is_empty() {
            clean
        } else if let Some(category) = category {
            category.name.to_string()
        } else {
            free_text.to_string()
        };

        debug!(
            query = free_text,
            category = category.map(|c| c.id),
            location = detected_location.as_deref(),
            "interpreted service request"
        );

        Ok(QueryIntent {
            category_id: category.map(|c| c.id.to_string()),
            suggested_term,
            detected_location,
        })
    }

    async fn polish_bio(
        &self,
        bio: &str,
        name: &str,
        profession: &str,
    ) -> Result<String, InterpreterError> {
        Ok(format!(
            "Hi, I'm {name}, a professional {profession}. {bio} I am dedicated to providing \
             high-quality service with a focus on customer satisfaction and timely completion."
        ))
    }
}
