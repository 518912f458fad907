use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub pinecone: PineconeConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiConfig {
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// API base URL, overridable for tests against a mock server.
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            embedding_model: default_embedding_model(),
            chat_model: default_chat_model(),
            api_base: default_openai_api_base(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct PineconeConfig {
    #[serde(default = "default_index_name")]
    pub index_name: String,
    /// Control-plane base URL, overridable for tests against a mock server.
    #[serde(default = "default_pinecone_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            index_name: default_index_name(),
            api_base: default_pinecone_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_index_name() -> String {
    "acme-rag".to_string()
}
fn default_pinecone_api_base() -> String {
    "https://api.pinecone.io".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Required API credentials, read from the environment at startup.
#[derive(Clone)]
pub struct Secrets {
    pub openai_api_key: String,
    pub pinecone_api_key: String,
}

impl Secrets {
    /// Read credentials from `OPENAI_API_KEY` and `PINECONE_API_KEY`.
    ///
    /// Fails when either variable is absent or empty, so a misconfigured
    /// process refuses to serve instead of failing on the first request.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            pinecone_api_key: require_env("PINECONE_API_KEY")?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{} environment variable not set", name),
    }
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist. `PINECONE_INDEX_NAME` in the environment overrides
/// the configured index name.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config: Config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        Config::default()
    };

    if let Ok(name) = std::env::var("PINECONE_INDEX_NAME") {
        if !name.trim().is_empty() {
            config.pinecone.index_name = name;
        }
    }

    if config.server.bind.is_empty() {
        bail!("server.bind must not be empty");
    }
    if config.openai.embedding_model.is_empty() {
        bail!("openai.embedding_model must not be empty");
    }
    if config.openai.chat_model.is_empty() {
        bail!("openai.chat_model must not be empty");
    }
    if config.pinecone.index_name.is_empty() {
        bail!("pinecone.index_name must not be empty");
    }

    Ok(config)
}
