// Inference service boundary
//
// The driver only needs one assembled response string per request and a
// distinguishable failure. `OmniChatClient` talks to an OpenAI-compatible
// chat completions endpoint that streams the answer as server-sent events;
// `sse` reassembles those fragments.

pub mod omni;
pub mod sse;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::codec::EncodedPayload;
use crate::error::Result;

pub use omni::OmniChatClient;

/// Token accounting reported by the service at the end of a stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Full answer for one request, fragments concatenated in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResponse {
    pub text: String,
    /// Number of content fragments received
    pub fragments: usize,
    pub usage: Option<TokenUsage>,
}

impl ClassificationResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fragments: 1,
            usage: None,
        }
    }
}

/// Sends one classification request per audio file
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Classify `payload` under `instruction`.
    ///
    /// Fails with `CoughScanError::Service` when the transport fails, the
    /// service reports an error, or no content is returned.
    async fn classify(&self, payload: &EncodedPayload, instruction: &str) -> Result<ClassificationResponse>;
}
