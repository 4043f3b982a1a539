use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::client::{build_http_client, read_api_error, require_key, DEFAULT_API_BASE};
use crate::config::DocQaConfig;
use crate::errors::{GeminiError, GeminiResult};
use crate::services::EmbeddingService;
use crate::types::{EmbedContent, EmbedContentRequest, EmbedContentResponse, TextPart};

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// Client for the Gemini embedContent API
#[derive(Debug, Clone)]
pub struct GeminiEmbeddingClient {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl GeminiEmbeddingClient {
    /// Create an embedding client. Uses the dedicated embedding key when set,
    /// the generation key otherwise.
    pub fn new(config: &DocQaConfig) -> GeminiResult<Self> {
        let key = config
            .embedding_api_key
            .as_deref()
            .or(config.gemini_api_key.as_deref());
        let api_key = require_key(key, "GEMINI_API_KEY")?;

        let model_name = config
            .embedding_model
            .clone()
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());

        Ok(Self {
            client: build_http_client()?,
            api_key,
            model_name,
            base_url: DEFAULT_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn get_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:embedContent?key={}",
            self.base_url, self.model_name, self.api_key
        )
    }

    fn build_request(&self, text: &str) -> EmbedContentRequest {
        EmbedContentRequest {
            model: format!("models/{}", self.model_name),
            content: EmbedContent {
                parts: vec![TextPart {
                    text: text.to_string(),
                }],
            },
            task_type: "RETRIEVAL_QUERY",
        }
    }
}

#[async_trait]
impl EmbeddingService for GeminiEmbeddingClient {
    async fn embed(&self, text: &str) -> GeminiResult<Vec<f32>> {
        debug!(model = %self.model_name, chars = text.len(), "Embedding query text");

        let response = self
            .client
            .post(self.get_url())
            .json(&self.build_request(text))
            .send()
            .await
            .map_err(|e| GeminiError::RequestError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(read_api_error(response).await);
        }

        let body = response
            .json::<EmbedContentResponse>()
            .await
            .map_err(|e| GeminiError::ParsingError(format!("Failed to parse embedding: {}", e)))?;

        extract_embedding(body)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn extract_embedding(body: EmbedContentResponse) -> GeminiResult<Vec<f32>> {
    if body.embedding.values.is_empty() {
        return Err(GeminiError::ResponseError(
            "Embedding response contained no values".to_string(),
        ));
    }
    Ok(body.embedding.values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(gemini: Option<&str>, embedding: Option<&str>) -> DocQaConfig {
        DocQaConfig {
            gemini_api_key: gemini.map(str::to_string),
            embedding_api_key: embedding.map(str::to_string),
            ..DocQaConfig::default()
        }
    }

    #[test]
    fn test_embedding_key_falls_back_to_gemini_key() {
        let client = GeminiEmbeddingClient::new(&config_with(Some("gen"), None)).unwrap();
        assert!(client.get_url().ends_with("text-embedding-004:embedContent?key=gen"));

        let client = GeminiEmbeddingClient::new(&config_with(Some("gen"), Some("emb"))).unwrap();
        assert!(client.get_url().ends_with("?key=emb"));

        assert!(GeminiEmbeddingClient::new(&config_with(None, None))
            .unwrap_err()
            .is_config());
    }

    #[test]
    fn test_request_shape() {
        let client = GeminiEmbeddingClient::new(&config_with(Some("gen"), None)).unwrap();
        let value = serde_json::to_value(client.build_request("What is a stack?")).unwrap();

        assert_eq!(value["model"], "models/text-embedding-004");
        assert_eq!(value["content"]["parts"][0]["text"], "What is a stack?");
        assert_eq!(value["taskType"], "RETRIEVAL_QUERY");
    }

    #[test]
    fn test_extract_embedding() {
        let body: EmbedContentResponse =
            serde_json::from_str(r#"{"embedding":{"values":[0.5,-0.25,1.0]}}"#).unwrap();
        assert_eq!(extract_embedding(body).unwrap(), vec![0.5, -0.25, 1.0]);

        let empty: EmbedContentResponse =
            serde_json::from_str(r#"{"embedding":{"values":[]}}"#).unwrap();
        assert!(extract_embedding(empty).is_err());
    }
}
