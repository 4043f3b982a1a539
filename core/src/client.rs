use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::DocQaConfig;
use crate::errors::{GeminiError, GeminiResult};
use crate::services::GenerationService;
use crate::types::*;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";

/// Client for the Gemini generateContent API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini API client from the generation settings in `config`
    pub fn new(config: &DocQaConfig) -> GeminiResult<Self> {
        let api_key = require_key(config.gemini_api_key.as_deref(), "GEMINI_API_KEY")?;

        let model_name = config
            .generation_model
            .clone()
            .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string());

        Ok(Self {
            client: build_http_client()?,
            api_key,
            model_name,
            base_url: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the generateContent URL for the configured model
    fn get_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model_name, self.api_key
        )
    }

    /// Build the request body for a conversation and system instruction
    pub fn build_request(&self, turns: &[Turn], system_instruction: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: turns.to_vec(),
            system_instruction: Some(SystemInstruction::text(system_instruction)),
        }
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let response = self
            .client
            .post(self.get_url())
            .json(request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(read_api_error(response).await);
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::ParsingError(format!("Failed to parse response: {}", e)))?;

        Ok(response_body)
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(&self, turns: &[Turn], system_instruction: &str) -> GeminiResult<String> {
        debug!(
            model = %self.model_name,
            turns = turns.len(),
            "Generating text with Gemini"
        );

        let request = self.build_request(turns, system_instruction);
        let response = self.generate_content(&request).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                "Gemini token usage: prompt={}, response={}, total={}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        extract_text_from_response(&response)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Extract the reply text from a response.
///
/// Joins the text of every part of the first candidate, so multi-part replies
/// come back whole.
pub fn extract_text_from_response(response: &GenerateContentResponse) -> GeminiResult<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| GeminiError::ResponseError("No candidates in response".to_string()))?;

    if let Some(reason) = &candidate.finish_reason {
        if reason != "STOP" {
            warn!("Gemini generation finish reason: {}", reason);
        }
    }

    let content = candidate
        .content
        .as_ref()
        .ok_or_else(|| GeminiError::ResponseError("No content in candidate".to_string()))?;

    let texts: Vec<&str> = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    if texts.is_empty() {
        return Err(GeminiError::ResponseError("No text in response".to_string()));
    }

    Ok(texts.concat())
}

/// Turn a non-2xx response into an error, preferring the structured Google error body
pub(crate) async fn read_api_error(response: Response) -> GeminiError {
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            return GeminiError::ResponseError(format!("Failed to read error response: {}", e))
        }
    };

    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(parsed) => GeminiError::ApiError {
            code: parsed.error.code,
            message: parsed.error.message,
            status: parsed.error.status,
        },
        Err(_) => GeminiError::HttpError {
            status_code: status.as_u16(),
            message: format!("API request failed: {}", body),
        },
    }
}

pub(crate) fn require_key(value: Option<&str>, name: &str) -> GeminiResult<String> {
    match value.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(GeminiError::ConfigError(format!(
            "{} is required to initialize the Gemini client",
            name
        ))),
    }
}

pub(crate) fn build_http_client() -> GeminiResult<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| GeminiError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}
