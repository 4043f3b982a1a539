//! Conversational retrieval-augmented question answering over an indexed document.
//!
//! A question flows through four components, sequenced by [`QueryPipeline`]:
//! the [`QueryRewriter`] turns it into a standalone query, the [`Retriever`]
//! embeds that query and fetches the nearest chunks, the [`ContextAssembler`]
//! joins their text, and the [`AnswerGenerator`] answers from that context and
//! records the exchange in the [`ConversationSession`].

pub mod assembler;
mod deadline;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod prompts;
pub mod retriever;
pub mod rewriter;
pub mod session;

#[cfg(test)]
mod test_support;

pub use assembler::{ContextAssembler, CONTEXT_SEPARATOR};
pub use error::{ExternalCall, RagError, RagResult};
pub use generator::AnswerGenerator;
pub use pipeline::{PipelineState, QueryPipeline};
pub use prompts::REFUSAL_SENTENCE;
pub use retriever::Retriever;
pub use rewriter::QueryRewriter;
pub use session::ConversationSession;
