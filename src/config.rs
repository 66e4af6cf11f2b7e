use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Parsed values describe an unusable chunking policy.
    #[error("Invalid chunking policy: {0}")]
    InvalidChunkPolicy(String),
}

/// Runtime configuration for the DocQA server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Target chunk length in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters.
    pub chunk_overlap: usize,
    /// Minimum chunk length; shorter trailing chunks are discarded.
    pub min_chunk_length: usize,
    /// Dimensionality of the produced vectors.
    pub embedding_dimension: usize,
    /// Default number of passages retrieved per question.
    pub search_default_top_k: usize,
    /// Upper bound accepted for `top_k` in ask requests.
    pub search_max_top_k: usize,
    /// Maximum characters included in a source preview.
    pub preview_max_chars: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            chunk_size: load_env_parsed("CHUNK_SIZE")?.unwrap_or(500),
            chunk_overlap: load_env_parsed("CHUNK_OVERLAP")?.unwrap_or(50),
            min_chunk_length: load_env_parsed("MIN_CHUNK_LENGTH")?.unwrap_or(50),
            embedding_dimension: load_env_parsed("EMBEDDING_DIMENSION")?.unwrap_or(384),
            search_default_top_k: load_env_parsed("SEARCH_DEFAULT_TOP_K")?.unwrap_or(5),
            search_max_top_k: load_env_parsed("SEARCH_MAX_TOP_K")?.unwrap_or(50),
            preview_max_chars: load_env_parsed("PREVIEW_MAX_CHARS")?.unwrap_or(200),
            server_port: load_env_parsed("SERVER_PORT")?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkPolicy(
                "CHUNK_SIZE must be greater than zero".into(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::InvalidChunkPolicy(
                "CHUNK_OVERLAP must be smaller than CHUNK_SIZE".into(),
            ));
        }
        if self.embedding_dimension == 0 {
            return Err(ConfigError::InvalidValue("EMBEDDING_DIMENSION".into()));
        }
        if self.search_default_top_k == 0 || self.search_max_top_k == 0 {
            return Err(ConfigError::InvalidValue("SEARCH_DEFAULT_TOP_K".into()));
        }
        Ok(())
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        chunk_size = config.chunk_size,
        chunk_overlap = config.chunk_overlap,
        min_chunk_length = config.min_chunk_length,
        embedding_dimension = config.embedding_dimension,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_chunking_policy() {
        let config = Config {
            chunk_size: 500,
            chunk_overlap: 50,
            min_chunk_length: 50,
            embedding_dimension: 384,
            search_default_top_k: 5,
            search_max_top_k: 50,
            preview_max_chars: 200,
            server_port: None,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let config = Config {
            chunk_size: 100,
            chunk_overlap: 100,
            min_chunk_length: 10,
            embedding_dimension: 384,
            search_default_top_k: 5,
            search_max_top_k: 50,
            preview_max_chars: 200,
            server_port: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidChunkPolicy(_))
        ));
    }
}
