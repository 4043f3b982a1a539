use std::fmt;
use std::time::Duration;

use docqa_core::GeminiError;
use docqa_index::IndexError;
use thiserror::Error;

/// The external calls a pipeline run makes, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalCall {
    RewriteGeneration,
    QueryEmbedding,
    IndexLookup,
    IndexQuery,
    AnswerGeneration,
}

impl fmt::Display for ExternalCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExternalCall::RewriteGeneration => "query rewrite",
            ExternalCall::QueryEmbedding => "query embedding",
            ExternalCall::IndexLookup => "index lookup",
            ExternalCall::IndexQuery => "index query",
            ExternalCall::AnswerGeneration => "answer generation",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by a pipeline run
#[derive(Debug, Error)]
pub enum RagError {
    /// Empty or blank question, rejected before any external call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Embedding service or vector index failed
    #[error("Retrieval failed during {call}: {source}")]
    Retrieval {
        call: ExternalCall,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generation service failed while rewriting or answering
    #[error("Generation failed during {call}: {source}")]
    Generation {
        call: ExternalCall,
        #[source]
        source: GeminiError,
    },

    /// Missing credential or index name, fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An external call exceeded its deadline and was cancelled
    #[error("{call} timed out after {after:?}")]
    Timeout { call: ExternalCall, after: Duration },
}

impl RagError {
    pub(crate) fn generation(call: ExternalCall, source: GeminiError) -> Self {
        RagError::Generation { call, source }
    }

    pub(crate) fn embedding(source: GeminiError) -> Self {
        RagError::Retrieval {
            call: ExternalCall::QueryEmbedding,
            source: Box::new(source),
        }
    }

    pub(crate) fn index(call: ExternalCall, source: IndexError) -> Self {
        RagError::Retrieval {
            call,
            source: Box::new(source),
        }
    }

    /// True when the failure was the user's input rather than a service
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RagError::InvalidInput(_))
    }
}

pub type RagResult<T> = Result<T, RagError>;

/// Reject empty and whitespace-only questions
pub(crate) fn validate_question(question: &str) -> RagResult<()> {
    if question.trim().is_empty() {
        return Err(RagError::InvalidInput(
            "Question cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_question() {
        assert!(validate_question("What is a stack?").is_ok());
        assert!(validate_question("").unwrap_err().is_invalid_input());
        assert!(validate_question(" \t\n ").unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_error_messages_name_the_call() {
        let err = RagError::Timeout {
            call: ExternalCall::QueryEmbedding,
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "query embedding timed out after 30s");

        let err = RagError::generation(
            ExternalCall::RewriteGeneration,
            GeminiError::ResponseError("No candidates in response".to_string()),
        );
        assert!(err.to_string().starts_with("Generation failed during query rewrite"));
    }
}
