use crate::errors::{GeminiError, GeminiResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Metadata keys that may carry chunk text, in lookup order
pub const DEFAULT_CONTEXT_FIELDS: [&str; 2] = ["pageContent", "text"];

/// Configuration for the document QA services
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DocQaConfig {
    pub gemini_api_key: Option<String>,
    /// Key for embedContent calls, falls back to `gemini_api_key`
    pub embedding_api_key: Option<String>,
    pub generation_model: Option<String>,
    pub embedding_model: Option<String>,
    pub pinecone_api_key: Option<String>,
    pub pinecone_index_name: Option<String>,
    /// Data-plane host; skips the describe-index lookup when set
    pub pinecone_index_host: Option<String>,
    pub pinecone_namespace: Option<String>,
    pub top_k: Option<usize>,
    /// Deadline for each external call, `0` disables it
    pub request_timeout_secs: Option<u64>,
    pub max_context_chars: Option<usize>,
    pub context_fields: Option<Vec<String>>,
    pub log_level: Option<String>,
}

impl Default for DocQaConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            embedding_api_key: None,
            generation_model: Some("gemini-2.0-flash".to_string()),
            embedding_model: Some("text-embedding-004".to_string()),
            pinecone_api_key: None,
            pinecone_index_name: None,
            pinecone_index_host: None,
            pinecone_namespace: None,
            top_k: Some(DEFAULT_TOP_K),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_context_chars: None,
            context_fields: Some(DEFAULT_CONTEXT_FIELDS.iter().map(|f| f.to_string()).collect()),
            log_level: Some("info".to_string()),
        }
    }
}

impl DocQaConfig {
    /// Loads configuration from a file if it exists, otherwise returns an empty config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        if !path.exists() {
            return Ok(Self::empty());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            GeminiError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            GeminiError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Reads the recognised variables from the process environment
    pub fn from_env() -> GeminiResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count as unset;
    /// a numeric variable that does not parse is a `ConfigError`.
    pub fn from_lookup<F>(lookup: F) -> GeminiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let number = |name: &str| -> GeminiResult<Option<u64>> {
            var(name)
                .map(|v| {
                    v.trim().parse::<u64>().map_err(|_| {
                        GeminiError::ConfigError(format!(
                            "{} must be a non-negative integer, got {:?}",
                            name, v
                        ))
                    })
                })
                .transpose()
        };

        Ok(Self {
            gemini_api_key: var("GEMINI_API_KEY"),
            embedding_api_key: var("GEMINI_EMBEDDING_API_KEY"),
            generation_model: var("GEMINI_MODEL"),
            embedding_model: var("GEMINI_EMBEDDING_MODEL"),
            pinecone_api_key: var("PINECONE_API_KEY"),
            pinecone_index_name: var("PINECONE_INDEX_NAME"),
            pinecone_index_host: var("PINECONE_INDEX_HOST"),
            pinecone_namespace: var("PINECONE_NAMESPACE"),
            top_k: number("DOCQA_TOP_K")?.map(|n| n as usize),
            request_timeout_secs: number("DOCQA_TIMEOUT_SECS")?,
            max_context_chars: number("DOCQA_MAX_CONTEXT_CHARS")?.map(|n| n as usize),
            context_fields: None,
            log_level: var("DOCQA_LOG_LEVEL"),
        })
    }

    /// A config with every field unset, used as the neutral element of `merge`
    pub fn empty() -> Self {
        Self {
            gemini_api_key: None,
            embedding_api_key: None,
            generation_model: None,
            embedding_model: None,
            pinecone_api_key: None,
            pinecone_index_name: None,
            pinecone_index_host: None,
            pinecone_namespace: None,
            top_k: None,
            request_timeout_secs: None,
            max_context_chars: None,
            context_fields: None,
            log_level: None,
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            gemini_api_key: other.gemini_api_key.clone().or_else(|| self.gemini_api_key.clone()),
            embedding_api_key: other
                .embedding_api_key
                .clone()
                .or_else(|| self.embedding_api_key.clone()),
            generation_model: other
                .generation_model
                .clone()
                .or_else(|| self.generation_model.clone()),
            embedding_model: other
                .embedding_model
                .clone()
                .or_else(|| self.embedding_model.clone()),
            pinecone_api_key: other
                .pinecone_api_key
                .clone()
                .or_else(|| self.pinecone_api_key.clone()),
            pinecone_index_name: other
                .pinecone_index_name
                .clone()
                .or_else(|| self.pinecone_index_name.clone()),
            pinecone_index_host: other
                .pinecone_index_host
                .clone()
                .or_else(|| self.pinecone_index_host.clone()),
            pinecone_namespace: other
                .pinecone_namespace
                .clone()
                .or_else(|| self.pinecone_namespace.clone()),
            top_k: other.top_k.or(self.top_k),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            max_context_chars: other.max_context_chars.or(self.max_context_chars),
            context_fields: other
                .context_fields
                .clone()
                .or_else(|| self.context_fields.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    /// Defaults, then the config file, then the environment
    pub fn load(path: Option<&Path>) -> GeminiResult<Self> {
        let file_config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(GeminiError::ConfigError(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::load_from_file(path)?
            }
            None => match get_default_config_file("docqa") {
                Ok(default_path) => Self::load_from_file(&default_path)?,
                Err(_) => Self::empty(),
            },
        };

        Ok(Self::default().merge(&file_config).merge(&Self::from_env()?))
    }

    pub fn top_k(&self) -> usize {
        self.top_k.unwrap_or(DEFAULT_TOP_K)
    }

    /// Per-call deadline; `None` when disabled with `0`
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn context_fields(&self) -> Vec<String> {
        match &self.context_fields {
            Some(fields) if !fields.is_empty() => fields.clone(),
            _ => DEFAULT_CONTEXT_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GeminiError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
