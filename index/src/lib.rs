// The docqa-index crate is the vector index seam of the query path.
// It exposes the `VectorIndex` trait, the chunks it returns, and a Pinecone
// client that implements it. Building and filling the index happens elsewhere.

mod chunk;
pub mod errors;
pub mod pinecone;

pub use chunk::RetrievedChunk;
pub use errors::{IndexError, IndexResult};
pub use pinecone::PineconeIndex;

use async_trait::async_trait;

/// Nearest-neighbour lookup over an already populated index
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` entries most similar to `vector`, in the index's own order.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> IndexResult<Vec<RetrievedChunk>>;

    /// Name used in logs
    fn index_name(&self) -> &str;
}
