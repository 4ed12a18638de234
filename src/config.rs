use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use anyhow::{Context, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub asr_config: GroqWhisperConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_log_filter() -> String {
    "transcription_relay=info,tower_http=info".to_string()
}

/// Configuration for Groq Whisper ASR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqWhisperConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_groq_base_url")]
    pub base_url: String,

    #[serde(default = "default_groq_model")]
    pub model: String,
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_groq_model() -> String {
    "whisper-large-v3".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path))?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".jsonld") || path_lower.ends_with(".json") {
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }

    /// Load from CONFIG_PATH when set, fall back to defaults, then apply
    /// environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("GROQ_API_KEY") {
            self.asr_config.api_key = api_key;
        }
        if let Some(host) = lookup("HOST") {
            self.system_config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.system_config.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value: {:?}", port))?;
        }
        Ok(())
    }
}

impl SystemConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .with_context(|| format!("invalid listen host {:?}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            log_filter: default_log_filter(),
        }
    }
}

impl Default for GroqWhisperConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_groq_base_url(),
            model: default_groq_model(),
        }
    }
}
