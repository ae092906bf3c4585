//! QueryInterpreter trait definition.
//!
//! The interpreter is an external capability with a fixed contract: free
//! text in, a `QueryIntent` hint out. The core never depends on how the
//! mapping is produced (keyword scoring, a language model, ...), and every
//! caller must tolerate degraded output.

use karigar_types::error::InterpreterError;
use karigar_types::query::QueryIntent;

/// Trait for free-text interpretation backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in karigar-infra (e.g., `KeywordInterpreter`).
pub trait QueryInterpreter: Send + Sync {
    /// Map a raw service request ("my ac is leaking in gulberg") to a
    /// structured category/term/location hint.
    fn interpret(
        &self,
        free_text: &str,
    ) -> impl std::future::Future<Output = Result<QueryIntent, InterpreterError>> + Send;

    /// Rewrite a provider bio into presentable marketing copy.
    fn polish_bio(
        &self,
        bio: &str,
        name: &str,
        profession: &str,
    ) -> impl std::future::Future<Output = Result<String, InterpreterError>> + Send;
}

/// The degraded interpreter: echoes the input back as the search term and
/// leaves the bio untouched. Exactly the minimum the contract permits.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoInterpreter;

impl QueryInterpreter for EchoInterpreter {
    async fn interpret(&self, free_text: &str) -> Result<QueryIntent, InterpreterError> {
        Ok(QueryIntent::echo(free_text))
    }

    async fn polish_bio(
        &self,
        bio: &str,
        _name: &str,
        _profession: &str,
    ) -> Result<String, InterpreterError> {
        Ok(bio.to_string())
    }
}
