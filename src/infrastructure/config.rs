use std::path::PathBuf;
use std::str::FromStr;

use crate::application::ports::{chat_responder::ChatConfig, document_indexer::IndexingConfig};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub document_file_name: String,
    pub isolate_sessions: bool,
    pub max_sessions: usize,
    /// Sessions untouched for this long are evicted; 0 keeps them forever.
    pub session_idle_timeout_secs: u64,
    pub session_sweep_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct EmbeddingServiceConfig {
    pub service_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_factor: f64,
}

#[derive(Debug, Clone)]
pub struct LanguageModelConfig {
    pub service_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

/// Everything the binary reads from its environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embeddings_service: EmbeddingServiceConfig,
    pub language_model: LanguageModelConfig,
    pub chunking: ChunkingConfig,
    pub indexing: IndexingConfig,
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Reads the process environment after loading `.env`, if one exists.
    pub fn from_env() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("no .env file loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let embedding_model_id = text("EMBEDDING_MODEL_ID", "BAAI/bge-small-en");
        let device = text("EMBEDDING_DEVICE", "cpu");
        let normalize_embeddings = parse_or(&lookup, "NORMALIZE_EMBEDDINGS", true);
        let store_endpoint = text("QDRANT_URL", "http://localhost:6333");
        let collection_name = text("COLLECTION_NAME", "vector_db");

        let language_model = LanguageModelConfig {
            service_url: text("OLLAMA_URL", "http://localhost:11434"),
            timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 120),
        };

        let chunk_size = parse_or(&lookup, "CHUNK_SIZE", 1000usize).max(1);
        let chunk_overlap = parse_or(&lookup, "CHUNK_OVERLAP", 250usize);

        Self {
            server: ServerConfig {
                port: parse_or(&lookup, "PORT", 3000),
                max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 250 * 1024 * 1024),
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from(text("UPLOAD_DIR", ".")),
                document_file_name: text("DOCUMENT_FILE_NAME", "temp.pdf"),
                isolate_sessions: parse_or(&lookup, "ISOLATE_SESSIONS", false),
                max_sessions: parse_or(&lookup, "MAX_SESSIONS", 1000),
                session_idle_timeout_secs: parse_or(&lookup, "SESSION_IDLE_TIMEOUT_SECS", 3600),
                session_sweep_interval_secs: parse_or(&lookup, "SESSION_SWEEP_INTERVAL_SECS", 60u64)
                    .max(1),
            },
            embeddings_service: EmbeddingServiceConfig {
                service_url: text("EMBEDDINGS_SERVICE_URL", "http://localhost:8080/embed"),
                timeout_secs: parse_or(&lookup, "EMBEDDINGS_TIMEOUT_SECS", 30),
                max_retries: parse_or(&lookup, "EMBEDDINGS_MAX_RETRIES", 0),
                backoff_factor: parse_or(&lookup, "EMBEDDINGS_BACKOFF_FACTOR", 1.5),
            },
            chunking: ChunkingConfig {
                chunk_size,
                chunk_overlap,
            },
            indexing: IndexingConfig {
                embedding_model_id: embedding_model_id.clone(),
                device: device.clone(),
                normalize_embeddings,
                store_endpoint: store_endpoint.clone(),
                collection_name: collection_name.clone(),
            },
            chat: ChatConfig {
                embedding_model_id,
                device,
                normalize_embeddings,
                llm_model_id: text("LLM_MODEL_ID", "llama3.2:3b"),
                llm_temperature: parse_or(&lookup, "LLM_TEMPERATURE", 0.7),
                store_endpoint,
                collection_name,
                top_k: parse_or(&lookup, "RETRIEVAL_TOP_K", 1usize).max(1),
            },
            language_model,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("ignoring invalid value {:?} for {}", raw, key);
                default
            }
        },
    }
}
