use std::sync::Arc;
use std::time::Duration;

use docqa_core::{GenerationService, Turn};
use tracing::debug;

use crate::deadline::with_deadline;
use crate::error::{validate_question, ExternalCall, RagError, RagResult};
use crate::prompts::{answer_instruction, DEFAULT_PERSONA};
use crate::session::ConversationSession;

/// Answers a question from the assembled context and records the exchange.
pub struct AnswerGenerator {
    generator: Arc<dyn GenerationService>,
    persona: String,
    call_timeout: Option<Duration>,
}

impl AnswerGenerator {
    pub fn new(generator: Arc<dyn GenerationService>, call_timeout: Option<Duration>) -> Self {
        Self {
            generator,
            persona: DEFAULT_PERSONA.to_string(),
            call_timeout,
        }
    }

    /// Replace the opening line of the answer instruction
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Generate the grounded answer to the user's original `question`.
    ///
    /// The model sees the history plus the question, with `context` inlined in
    /// the system instruction. Only when it answers are the question and the
    /// answer appended to the session, so a failed call adds nothing.
    pub async fn generate(
        &self,
        question: &str,
        context: &str,
        session: &mut ConversationSession,
    ) -> RagResult<String> {
        validate_question(question)?;

        let turns = session.with_pending(Turn::user(question));
        let instruction = answer_instruction(&self.persona, context);
        let call = ExternalCall::AnswerGeneration;

        let answer = with_deadline(call, self.call_timeout, async {
            self.generator
                .generate(&turns, &instruction)
                .await
                .map_err(|e| RagError::generation(call, e))
        })
        .await?;

        session.commit_exchange(question, &answer);
        debug!(
            session = %session.id,
            history_len = session.len(),
            context_chars = context.len(),
            "Recorded answered exchange"
        );
        Ok(answer)
    }
}
