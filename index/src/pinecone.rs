use async_trait::async_trait;
use docqa_core::config::DocQaConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::chunk::RetrievedChunk;
use crate::errors::{IndexError, IndexResult};
use crate::VectorIndex;

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-07";

/// Handle on one Pinecone serverless/pod index
#[derive(Debug, Clone)]
pub struct PineconeIndex {
    http_client: Client,
    api_key: String,
    index_name: String,
    host: String,
    namespace: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RetrievedChunk>,
}

#[derive(Deserialize, Debug)]
struct IndexDescription {
    #[serde(default)]
    host: String,
    #[serde(default)]
    status: Option<IndexStatus>,
}

#[derive(Deserialize, Debug)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    state: String,
}

impl PineconeIndex {
    /// Connect to the configured index.
    ///
    /// Credentials are checked before any request is made. The data-plane host
    /// is taken from config when given, otherwise looked up by index name.
    pub async fn connect(config: &DocQaConfig) -> IndexResult<Self> {
        let api_key = required(config.pinecone_api_key.as_deref(), "PINECONE_API_KEY")?;
        let index_name = required(config.pinecone_index_name.as_deref(), "PINECONE_INDEX_NAME")?;

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| IndexError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let mut index = Self {
            http_client,
            api_key,
            index_name,
            host: String::new(),
            namespace: config.pinecone_namespace.clone(),
        };

        index.host = match config.pinecone_index_host.as_deref() {
            Some(host) if !host.trim().is_empty() => normalize_host(host),
            _ => index.describe_host().await?,
        };

        info!(index = %index.index_name, host = %index.host, "Pinecone index configured");
        Ok(index)
    }

    /// Look up the data-plane host of the index through the control plane
    async fn describe_host(&self) -> IndexResult<String> {
        let url = format!("{}/indexes/{}", CONTROL_PLANE_URL, self.index_name);
        debug!("Describing Pinecone index at {}", url);

        let response = self.authorized(self.http_client.get(&url)).send().await.map_err(|e| {
            IndexError::Request(format!("Failed to describe index '{}': {}", self.index_name, e))
        })?;
        let response = check_status(response).await?;

        let description = response
            .json::<IndexDescription>()
            .await
            .map_err(|e| IndexError::Parse(e.to_string()))?;

        host_from_description(&self.index_name, description)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.host)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> IndexResult<Vec<RetrievedChunk>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .authorized(self.http_client.post(self.query_url()))
            .json(&request)
            .send()
            .await
            .map_err(|e| IndexError::Request(format!("Failed to query index: {}", e)))?;
        let response = check_status(response).await?;

        let body = response
            .json::<QueryResponse>()
            .await
            .map_err(|e| IndexError::Parse(e.to_string()))?;

        debug!(index = %self.index_name, matches = body.matches.len(), "Pinecone query returned");
        Ok(body.matches)
    }

    fn index_name(&self) -> &str {
        &self.index_name
    }
}

fn required(value: Option<&str>, name: &str) -> IndexResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(IndexError::Config(format!(
            "{} is required to connect to the vector index",
            name
        ))),
    }
}

async fn check_status(response: Response) -> IndexResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
    Err(IndexError::Http {
        status_code: status.as_u16(),
        message,
    })
}

fn host_from_description(index_name: &str, description: IndexDescription) -> IndexResult<String> {
    if let Some(status) = &description.status {
        if !status.ready {
            warn!(index = index_name, state = %status.state, "Pinecone index is not ready");
        }
    }
    if description.host.trim().is_empty() {
        return Err(IndexError::NotReady(format!(
            "index '{}' has no host assigned yet",
            index_name
        )));
    }
    Ok(normalize_host(&description.host))
}

/// Hosts come back bare ("idx-abc.svc.pinecone.io"); requests need a scheme
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
