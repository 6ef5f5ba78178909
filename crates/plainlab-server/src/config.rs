//! Configuration file parsing for the server
//!
//! Loads settings from TOML: bind address, engine endpoints and models,
//! timeouts, and the recognition-confidence floor.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// Generation and vision engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Pipeline tunables
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

/// Local engine endpoints and models
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Ollama endpoint for both generation and vision
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Text model for extraction and summarization
    #[serde(default = "default_model")]
    pub model: String,

    /// Vision-capable model for recognition
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Timeout for one engine call (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Pipeline tunables
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// Recognition-confidence floor; lower-scoring runs are refused
    #[serde(default = "default_min_text_confidence")]
    pub min_text_confidence: f64,

    /// Maximum report text length (characters)
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_vision_model() -> String {
    "llama3.2-vision:latest".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_min_text_confidence() -> f64 {
    0.3
}

fn default_max_text_length() -> usize {
    50_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            vision_model: default_vision_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            min_text_confidence: default_min_text_confidence(),
            max_text_length: default_max_text_length(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.pipeline.min_text_confidence) {
            return Err(ConfigError::Invalid(
                "min_text_confidence must be within [0.0, 1.0]".to_string(),
            ));
        }
        if self.engine.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            engine: EngineConfig::default(),
            pipeline: PipelineSettings::default(),
        }
    }

    /// Socket address string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
