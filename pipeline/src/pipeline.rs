use std::fmt;
use std::sync::Arc;

use docqa_core::{
    DocQaConfig, EmbeddingService, GeminiClient, GeminiEmbeddingClient, GenerationService,
};
use docqa_index::{PineconeIndex, VectorIndex};
use tracing::{debug, info, warn};

use crate::assembler::ContextAssembler;
use crate::error::{validate_question, ExternalCall, RagError, RagResult};
use crate::generator::AnswerGenerator;
use crate::retriever::Retriever;
use crate::rewriter::QueryRewriter;
use crate::session::ConversationSession;

/// Where a pipeline run is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Rewriting,
    Retrieving,
    Assembling,
    Generating,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Sequences rewrite, retrieval, assembly and answer generation for one question at a time.
///
/// The service clients are built once and shared by every run. Runs take the
/// session by `&mut`, so two runs can never interleave on the same history.
pub struct QueryPipeline {
    rewriter: QueryRewriter,
    retriever: Retriever,
    assembler: ContextAssembler,
    answerer: AnswerGenerator,
}

impl QueryPipeline {
    pub fn new(
        rewriter: QueryRewriter,
        retriever: Retriever,
        assembler: ContextAssembler,
        answerer: AnswerGenerator,
    ) -> Self {
        Self {
            rewriter,
            retriever,
            assembler,
            answerer,
        }
    }

    /// Wire the components to already constructed services
    pub fn from_services(
        generation: Arc<dyn GenerationService>,
        embedding: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        config: &DocQaConfig,
    ) -> Self {
        let call_timeout = config.request_timeout();

        Self::new(
            QueryRewriter::new(generation.clone(), call_timeout),
            Retriever::new(embedding, index, config.top_k(), call_timeout),
            ContextAssembler::new(config.context_fields()).with_max_chars(config.max_context_chars),
            AnswerGenerator::new(generation, call_timeout),
        )
    }

    /// Build the Gemini and Pinecone clients from configuration.
    ///
    /// Missing credentials fail here with `Configuration`, before any question is taken.
    pub async fn from_config(config: &DocQaConfig) -> RagResult<Self> {
        let generation =
            GeminiClient::new(config).map_err(|e| RagError::Configuration(e.to_string()))?;
        let embedding = GeminiEmbeddingClient::new(config)
            .map_err(|e| RagError::Configuration(e.to_string()))?;
        let index = PineconeIndex::connect(config).await.map_err(|e| {
            if e.is_config() {
                RagError::Configuration(e.to_string())
            } else {
                RagError::index(ExternalCall::IndexLookup, e)
            }
        })?;

        info!(
            generation_model = GenerationService::model_name(&generation),
            embedding_model = EmbeddingService::model_name(&embedding),
            index = index.index_name(),
            top_k = config.top_k(),
            "Query pipeline ready"
        );

        Ok(Self::from_services(
            Arc::new(generation),
            Arc::new(embedding),
            Arc::new(index),
            config,
        ))
    }

    /// Answer one question, recording the exchange in `session` on success.
    ///
    /// Any failure is returned as is; the session then holds exactly what it
    /// held before the call.
    pub async fn ask(&self, question: &str, session: &mut ConversationSession) -> RagResult<String> {
        let mut state = PipelineState::Idle;
        let result = self.run(question, session, &mut state).await;

        if let Err(e) = &result {
            warn!(failed_in = %state, error = %e, "Pipeline run failed");
            state = PipelineState::Failed;
        } else {
            state = PipelineState::Idle;
        }
        debug!(state = %state, history_len = session.len(), "Pipeline run finished");
        result
    }

    async fn run(
        &self,
        question: &str,
        session: &mut ConversationSession,
        state: &mut PipelineState,
    ) -> RagResult<String> {
        validate_question(question)?;

        *state = PipelineState::Rewriting;
        let standalone = self.rewriter.rewrite(question, session).await?;

        *state = PipelineState::Retrieving;
        let matches = self.retriever.retrieve(&standalone).await?;

        *state = PipelineState::Assembling;
        let context = self.assembler.assemble(&matches);
        if context.is_empty() {
            debug!("No chunk text in retrieved matches, answering from empty context");
        }

        *state = PipelineState::Generating;
        self.answerer.generate(question, &context, session).await
    }
}
