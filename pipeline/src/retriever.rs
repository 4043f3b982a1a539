use std::sync::Arc;
use std::time::Duration;

use docqa_core::EmbeddingService;
use docqa_index::{RetrievedChunk, VectorIndex};
use tracing::{debug, info};

use crate::deadline::with_deadline;
use crate::error::{ExternalCall, RagError, RagResult};

/// Embeds a standalone query and fetches its nearest chunks.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
    call_timeout: Option<Duration>,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
        call_timeout: Option<Duration>,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
            call_timeout,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Matches for `standalone_query` in the index's own order, metadata included.
    /// No re-ranking, deduplication or retries.
    pub async fn retrieve(&self, standalone_query: &str) -> RagResult<Vec<RetrievedChunk>> {
        let query_vector = with_deadline(ExternalCall::QueryEmbedding, self.call_timeout, async {
            self.embedder
                .embed(standalone_query)
                .await
                .map_err(RagError::embedding)
        })
        .await?;

        debug!(
            model = self.embedder.model_name(),
            dimensions = query_vector.len(),
            "Embedded standalone query"
        );

        let matches = with_deadline(ExternalCall::IndexQuery, self.call_timeout, async {
            self.index
                .query(&query_vector, self.top_k, true)
                .await
                .map_err(|e| RagError::index(ExternalCall::IndexQuery, e))
        })
        .await?;

        info!(
            index = self.index.index_name(),
            "Retrieved {} documents",
            matches.len()
        );
        Ok(matches)
    }
}
