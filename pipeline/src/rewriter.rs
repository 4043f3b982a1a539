use std::sync::Arc;
use std::time::Duration;

use docqa_core::{GenerationService, Turn};
use tracing::debug;

use crate::deadline::with_deadline;
use crate::error::{validate_question, ExternalCall, RagError, RagResult};
use crate::prompts::REWRITE_INSTRUCTION;
use crate::session::ConversationSession;

/// Turns a follow-up question into one that stands on its own.
pub struct QueryRewriter {
    generator: Arc<dyn GenerationService>,
    call_timeout: Option<Duration>,
}

impl QueryRewriter {
    pub fn new(generator: Arc<dyn GenerationService>, call_timeout: Option<Duration>) -> Self {
        Self {
            generator,
            call_timeout,
        }
    }

    /// Rewrite `question` against the conversation so far.
    ///
    /// The model sees the recorded turns followed by the question, but the
    /// session is only borrowed: nothing is added to it, whatever the outcome.
    /// The model's text is returned as is.
    pub async fn rewrite(&self, question: &str, session: &ConversationSession) -> RagResult<String> {
        validate_question(question)?;

        let turns = session.with_pending(Turn::user(question));
        let call = ExternalCall::RewriteGeneration;

        let rewritten = with_deadline(call, self.call_timeout, async {
            self.generator
                .generate(&turns, REWRITE_INSTRUCTION)
                .await
                .map_err(|e| RagError::generation(call, e))
        })
        .await?;

        debug!(
            original = question,
            rewritten = rewritten.as_str(),
            history_len = session.len(),
            "Rewrote question into standalone query"
        );
        Ok(rewritten)
    }
}
