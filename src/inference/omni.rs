use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::codec::EncodedPayload;
use crate::config::ServiceConfig;
use crate::error::{Result, CoughScanError};
use super::{InferenceClient, ClassificationResponse, sse::SseDecoder};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    modalities: [&'static str; 1],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_options: Option<StreamOptions>,
}

#[derive(Debug, Serialize)]
struct StreamOptions {
    include_usage: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    InputAudio { input_audio: InputAudio<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct InputAudio<'a> {
    data: String,
    format: &'a str,
}

/// Streaming client for an OpenAI-compatible multimodal chat endpoint
pub struct OmniChatClient {
    client: Client,
    config: ServiceConfig,
    api_key: String,
}

impl OmniChatClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("coughscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CoughScanError::Http)?;

        Ok(Self { client, config, api_key })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, payload: &'a EncodedPayload, instruction: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::InputAudio {
                        input_audio: InputAudio {
                            data: payload.data_uri(),
                            format: &payload.format,
                        },
                    },
                    ContentPart::Text { text: instruction },
                ],
            }],
            modalities: ["text"],
            stream: true,
            stream_options: self
                .config
                .include_usage
                .then_some(StreamOptions { include_usage: true }),
        }
    }

    /// Check that the endpoint is reachable and the key is accepted
    pub async fn check_availability(&self) -> Result<()> {
        let url = format!("{}/models", self.config.endpoint.trim_end_matches('/'));
        let response = self.client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| CoughScanError::Service(format!("Cannot reach {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CoughScanError::Service(format!(
                "Service check failed {}: {}", status, body
            )));
        }

        info!("Inference service reachable at {}", self.config.endpoint);
        Ok(())
    }
}

#[async_trait]
impl InferenceClient for OmniChatClient {
    async fn classify(&self, payload: &EncodedPayload, instruction: &str) -> Result<ClassificationResponse> {
        let url = self.completions_url();
        let request = self.build_request(payload, instruction);

        debug!("Sending {} audio ({} encoded bytes) to {}", payload.format, payload.data.len(), url);

        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CoughScanError::Service(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CoughScanError::Service(format!(
                "API error {}: {}", status, error_text
            )));
        }

        let mut decoder = SseDecoder::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| CoughScanError::Service(format!("Stream interrupted: {}", e)))?;
            decoder.push(&chunk)?;
            if decoder.is_done() {
                break;
            }
        }

        let response = decoder.finish()?;
        debug!("Received {} fragments, {} chars", response.fragments, response.text.chars().count());
        Ok(response)
    }
}
