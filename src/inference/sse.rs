use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, CoughScanError};
use super::{ClassificationResponse, TokenUsage};

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    error: StreamErrorBody,
}

#[derive(Debug, Deserialize)]
struct StreamErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Incremental decoder for a chat completions event stream.
///
/// Network chunks may split an event anywhere, including inside a UTF-8
/// sequence, so bytes are buffered until a full line is available.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    text: String,
    fragments: usize,
    usage: Option<TokenUsage>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `data: [DONE]` has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one network chunk
    pub fn push(&mut self, chunk: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(chunk);

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.handle_line(&line)?;
        }

        Ok(())
    }

    /// Flush any trailing line and return the assembled response
    pub fn finish(mut self) -> Result<ClassificationResponse> {
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.handle_line(&line)?;
        }

        if self.fragments == 0 {
            return Err(CoughScanError::Service("service returned no content".to_string()));
        }

        Ok(ClassificationResponse {
            text: self.text.trim().to_string(),
            fragments: self.fragments,
            usage: self.usage,
        })
    }

    fn handle_line(&mut self, raw: &[u8]) -> Result<()> {
        if self.done {
            return Ok(());
        }

        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\r', '\n']);

        // Comments, event names and ids carry nothing we need
        let Some(data) = line.strip_prefix("data:") else {
            return Ok(());
        };
        let data = data.trim_start();

        if data.is_empty() {
            return Ok(());
        }
        if data == "[DONE]" {
            self.done = true;
            return Ok(());
        }

        if let Ok(err) = serde_json::from_str::<StreamError>(data) {
            let code = err
                .error
                .code
                .map(|c| c.as_str().map(str::to_string).unwrap_or_else(|| c.to_string()))
                .unwrap_or_default();
            let message = err.error.message.unwrap_or_else(|| "unknown error".to_string());
            return Err(CoughScanError::Service(format!("stream error {}: {}", code, message)));
        }

        let chunk: ChatCompletionChunk = serde_json::from_str(data).map_err(|e| {
            CoughScanError::Service(format!("malformed stream event: {}", e))
        })?;

        if let Some(usage) = chunk.usage {
            debug!("Token usage: prompt={} completion={} total={}",
                   usage.prompt_tokens, usage.completion_tokens, usage.total_tokens);
            self.usage = Some(usage);
        }

        let content = chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|content| !content.is_empty());

        if let Some(content) = content {
            self.text.push_str(&content);
            self.fragments += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"delta": {"content": content}, "index": 0}]})
        )
    }

    #[test]
    fn test_concatenates_fragments_in_order() {
        let mut decoder = SseDecoder::new();
        for piece in ["最终", "结论：", "有咳嗽"] {
            decoder.push(event(piece).as_bytes()).unwrap();
        }
        decoder.push(b"data: [DONE]\n\n").unwrap();
        assert!(decoder.is_done());

        let response = decoder.finish().unwrap();
        assert_eq!(response.text, "最终结论：有咳嗽");
        assert_eq!(response.fragments, 3);
    }

    #[test]
    fn test_event_split_across_chunks() {
        let stream = format!("{}{}data: [DONE]\n", event("无咳"), event("嗽"));
        let bytes = stream.as_bytes();

        let mut decoder = SseDecoder::new();
        // Split inside a multi-byte character and inside the JSON
        for chunk in bytes.chunks(7) {
            decoder.push(chunk).unwrap();
        }

        assert_eq!(decoder.finish().unwrap().text, "无咳嗽");
    }

    #[test]
    fn test_usage_chunk_without_choices() {
        let mut decoder = SseDecoder::new();
        decoder.push(event("有咳嗽").as_bytes()).unwrap();
        decoder
            .push(b"data: {\"choices\":[],\"usage\":{\"prompt_tokens\":120,\"completion_tokens\":3,\"total_tokens\":123}}\r\n\r\n")
            .unwrap();

        let response = decoder.finish().unwrap();
        assert_eq!(response.text, "有咳嗽");
        assert_eq!(response.usage.unwrap().total_tokens, 123);
    }

    #[test]
    fn test_no_content_is_service_error() {
        let mut decoder = SseDecoder::new();
        decoder.push(b": keep-alive\n\ndata: [DONE]\n\n").unwrap();
        assert!(matches!(decoder.finish(), Err(CoughScanError::Service(_))));
    }

    #[test]
    fn test_whitespace_only_content_is_a_response() {
        let mut decoder = SseDecoder::new();
        decoder.push(event("  \n").as_bytes()).unwrap();
        let response = decoder.finish().unwrap();
        assert_eq!(response.text, "");
        assert_eq!(response.fragments, 1);
    }

    #[test]
    fn test_role_only_stream_is_service_error() {
        let mut decoder = SseDecoder::new();
        decoder
            .push(b"data: {\"choices\":[{\"delta\":{\"content\":\"\",\"role\":\"assistant\"},\"index\":0}]}\n\n")
            .unwrap();
        decoder
            .push(b"data: {\"choices\":[],\"usage\":{\"prompt_tokens\":1,\"completion_tokens\":0,\"total_tokens\":1}}\n\n")
            .unwrap();
        decoder.push(b"data: [DONE]\n\n").unwrap();

        assert!(matches!(decoder.finish(), Err(CoughScanError::Service(_))));
    }

    #[test]
    fn test_empty_role_chunk_is_not_a_fragment() {
        let mut decoder = SseDecoder::new();
        decoder.push(event("").as_bytes()).unwrap();
        decoder.push(event("无咳嗽").as_bytes()).unwrap();

        let response = decoder.finish().unwrap();
        assert_eq!(response.text, "无咳嗽");
        assert_eq!(response.fragments, 1);
    }

    #[test]
    fn test_in_stream_error() {
        let mut decoder = SseDecoder::new();
        let result = decoder.push(
            b"data: {\"error\":{\"code\":\"InvalidParameter\",\"message\":\"audio too long\"}}\n\n",
        );
        match result {
            Err(CoughScanError::Service(msg)) => assert!(msg.contains("audio too long")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_trailing_line_without_newline() {
        let mut decoder = SseDecoder::new();
        let line = event("有咳嗽");
        decoder.push(line.trim_end().as_bytes()).unwrap();
        assert_eq!(decoder.finish().unwrap().text, "有咳嗽");
    }

    #[test]
    fn test_events_after_done_are_ignored() {
        let mut decoder = SseDecoder::new();
        decoder.push(event("无咳嗽").as_bytes()).unwrap();
        decoder.push(b"data: [DONE]\n").unwrap();
        decoder.push(event("有咳嗽").as_bytes()).unwrap();
        assert_eq!(decoder.finish().unwrap().text, "无咳嗽");
    }
}
