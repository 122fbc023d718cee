use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use crate::error::{Result, CoughScanError};

fn default_api_key_env() -> String {
    "DASHSCOPE_API_KEY".to_string()
}

fn default_include_usage() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    ["mp3", "wav", "flac", "aac", "ogg"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the OpenAI-compatible endpoint (without /chat/completions)
    pub endpoint: String,
    /// Multimodal model used for classification
    pub model: String,
    /// API key; takes precedence over `api_key_env`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is not set
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Ask the service to append a token usage block to the stream
    #[serde(default = "default_include_usage")]
    pub include_usage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Prompting strategy used for the whole run
    pub strategy: StrategyKind,
    /// Recording environment framing of the instruction
    pub environment: Environment,
    /// Result file; derived from strategy and environment when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    /// Fixed pause before every file, in milliseconds
    pub request_delay_ms: u64,
    /// How strictly an encoded payload is checked before it is sent
    pub payload_check: PayloadCheck,
    /// File extensions (without dot, case-insensitive) treated as audio
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Direct: ask for the two-valued answer only
    Direct,
    /// Chain of thought: enumerate acoustic criteria before concluding
    Cot,
    /// Self-ask: four sub-questions and an anchored final conclusion line
    SelfAsk,
    /// Tree of thoughts: score three competing hypotheses
    Tot,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [Self::Direct, Self::Cot, Self::SelfAsk, Self::Tot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Cot => "cot",
            Self::SelfAsk => "self-ask",
            Self::Tot => "tot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    /// No assumption about the recording conditions
    Standard,
    /// Quiet room: low-amplitude evidence is acceptable
    Quiet,
    /// Noisy surroundings: look for coughs masked by background sound
    Noisy,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Self::Standard, Self::Quiet, Self::Noisy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Quiet => "quiet",
            Self::Noisy => "noisy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadCheck {
    /// Decode the encoded text and compare it with the source bytes
    RoundTrip,
    /// Only check that the encoded text is well-formed
    Syntax,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                endpoint: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
                model: "qwen-omni-turbo".to_string(),
                api_key: None,
                api_key_env: default_api_key_env(),
                timeout_secs: 300,
                include_usage: true,
            },
            run: RunConfig {
                strategy: StrategyKind::SelfAsk,
                environment: Environment::Standard,
                output_file: None,
                request_delay_ms: 2000,
                payload_check: PayloadCheck::RoundTrip,
                extensions: default_extensions(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoughScanError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| CoughScanError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CoughScanError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| CoughScanError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.service.endpoint.trim().is_empty() {
            return Err(CoughScanError::Config("service.endpoint must not be empty".to_string()));
        }
        if self.service.model.trim().is_empty() {
            return Err(CoughScanError::Config("service.model must not be empty".to_string()));
        }
        if self.run.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(CoughScanError::Config("run.extensions must list at least one extension".to_string()));
        }
        Ok(())
    }
}

impl ServiceConfig {
    /// Literal key first, then the configured environment variable
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }

        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CoughScanError::Config(format!(
                "No API key configured: set service.api_key or the {} environment variable",
                self.api_key_env
            )))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RunConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}
