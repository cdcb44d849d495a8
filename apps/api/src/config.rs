use anyhow::{anyhow, Context, Result};

use crate::screening::chunker::{ChunkerConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

/// Service configuration loaded from environment variables.
/// Every variable has a default so a local Ollama install works out of the box.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_url: String,
    pub llm_model: String,
    pub embedding_model: String,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
    /// Chunk window and overlap, in chars.
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Optional JSON file replacing the built-in role weight table.
    pub role_weights_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ollama_url: env_or("OLLAMA_URL", "http://127.0.0.1:11434"),
            llm_model: env_or("LLM_MODEL", "llama3"),
            embedding_model: env_or("EMBEDDING_MODEL", "nomic-embed-text"),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", "26214400")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            chunk_size: env_or("CHUNK_SIZE", &DEFAULT_CHUNK_SIZE.to_string())
                .parse::<usize>()
                .context("CHUNK_SIZE must be a whole number of characters")?,
            chunk_overlap: env_or("CHUNK_OVERLAP", &DEFAULT_CHUNK_OVERLAP.to_string())
                .parse::<usize>()
                .context("CHUNK_OVERLAP must be a whole number of characters")?,
            role_weights_path: std::env::var("ROLE_WEIGHTS_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Chunker settings; the overlap must be smaller than a non-zero size.
    pub fn chunker(&self) -> Result<ChunkerConfig> {
        ChunkerConfig::new(self.chunk_size, self.chunk_overlap).ok_or_else(|| {
            anyhow!(
                "CHUNK_OVERLAP ({}) must be smaller than a non-zero CHUNK_SIZE ({})",
                self.chunk_overlap,
                self.chunk_size
            )
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
