//! Hand-written stand-ins for the external services, recording every call.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use docqa_core::{EmbeddingService, GeminiError, GeminiResult, GenerationService, Turn};
use docqa_index::{IndexError, IndexResult, RetrievedChunk, VectorIndex};
use serde_json::{json, Value};

/// A recorded generation request
#[derive(Debug, Clone)]
pub struct GenerationCall {
    pub turns: Vec<Turn>,
    pub system_instruction: String,
}

/// Replies with queued results in order; errors are queued as `Err(message)`
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<GenerationCall>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self::build(replies, None))
    }

    /// Sleeps before every reply, for deadline tests
    pub fn slow(replies: Vec<Result<&str, &str>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self::build(replies, Some(delay)))
    }

    fn build(replies: Vec<Result<&str, &str>>, delay: Option<Duration>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
            delay,
        }
    }

    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationService for ScriptedGenerator {
    async fn generate(&self, turns: &[Turn], system_instruction: &str) -> GeminiResult<String> {
        self.calls.lock().unwrap().push(GenerationCall {
            turns: turns.to_vec(),
            system_instruction: system_instruction.to_string(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));
        reply.map_err(|message| GeminiError::ApiError {
            code: 503,
            message,
            status: "UNAVAILABLE".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Returns the same vector for every text, or always fails
pub struct FixedEmbedder {
    vector: Option<Vec<f32>>,
    texts: Mutex<Vec<String>>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Arc<Self> {
        Arc::new(Self {
            vector: Some(vector),
            texts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            vector: None,
            texts: Mutex::new(Vec::new()),
        })
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingService for FixedEmbedder {
    async fn embed(&self, text: &str) -> GeminiResult<Vec<f32>> {
        self.texts.lock().unwrap().push(text.to_string());
        self.vector.clone().ok_or_else(|| GeminiError::HttpError {
            status_code: 429,
            message: "quota exceeded".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "fixed-embedding"
    }
}

/// Serves a fixed match list, or always fails
pub struct StaticIndex {
    matches: Option<Vec<RetrievedChunk>>,
    queries: AtomicUsize,
    last_request: Mutex<Option<(Vec<f32>, usize, bool)>>,
}

impl StaticIndex {
    pub fn new(matches: Vec<RetrievedChunk>) -> Arc<Self> {
        Arc::new(Self {
            matches: Some(matches),
            queries: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            matches: None,
            queries: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(Vec<f32>, usize, bool)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for StaticIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> IndexResult<Vec<RetrievedChunk>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((vector.to_vec(), top_k, include_metadata));
        match &self.matches {
            Some(matches) => Ok(matches.iter().take(top_k).cloned().collect()),
            None => Err(IndexError::Http {
                status_code: 401,
                message: "invalid api key".to_string(),
            }),
        }
    }

    fn index_name(&self) -> &str {
        "static"
    }
}

/// Build a match from a JSON metadata object
pub fn chunk(id: &str, score: f32, metadata: Value) -> RetrievedChunk {
    RetrievedChunk::new(id, score, metadata.as_object().cloned().unwrap_or_default())
}

/// A match whose text sits under `pageContent`
pub fn page(id: &str, score: f32, text: &str) -> RetrievedChunk {
    chunk(id, score, json!({ "pageContent": text }))
}
