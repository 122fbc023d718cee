// Audio payload encoding
//
// Audio bytes travel to the inference service as standard base64 inside a
// data URI. A payload is only handed to the client after it passes the
// configured check; a failed check is an ordinary per-file outcome.

use base64::{Engine as _, engine::general_purpose};

use crate::config::PayloadCheck;
use crate::discovery::AudioItem;
use crate::error::{Result, CoughScanError};

/// Encoded audio ready to be embedded in a classification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    /// Transport-safe text encoding of the file contents
    pub data: String,
    /// Format token, the lower-cased extension without its dot
    pub format: String,
}

impl EncodedPayload {
    /// `data:audio/<fmt>;base64,<data>` as expected by the chat API
    pub fn data_uri(&self) -> String {
        format!("data:audio/{};base64,{}", self.format, self.data)
    }
}

/// Lossless binary-to-text encoding used for audio payloads
pub trait PayloadCodec: Send + Sync {
    fn encode(&self, bytes: &[u8]) -> String;

    /// True iff `text` is well-formed for this encoding
    fn validate(&self, text: &str) -> bool;

    fn decode(&self, text: &str) -> Result<Vec<u8>>;
}

/// Standard-alphabet, padded base64
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl PayloadCodec for Base64Codec {
    fn encode(&self, bytes: &[u8]) -> String {
        general_purpose::STANDARD.encode(bytes)
    }

    fn validate(&self, text: &str) -> bool {
        general_purpose::STANDARD.decode(text).is_ok()
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>> {
        general_purpose::STANDARD
            .decode(text)
            .map_err(|e| CoughScanError::Encoding(format!("invalid base64: {}", e)))
    }
}

/// Encode `bytes` and check the result according to `check`.
///
/// Returns `None` when the encoded text fails the check; the caller records
/// the item as an encoding failure without contacting the service.
pub fn prepare_payload(
    codec: &dyn PayloadCodec,
    item: &AudioItem,
    bytes: &[u8],
    check: PayloadCheck,
) -> Option<EncodedPayload> {
    let data = codec.encode(bytes);

    let accepted = match check {
        PayloadCheck::Syntax => codec.validate(&data),
        PayloadCheck::RoundTrip => {
            codec.validate(&data)
                && codec.decode(&data).map(|decoded| decoded == bytes).unwrap_or(false)
        }
    };

    accepted.then(|| EncodedPayload {
        data,
        format: item.format.clone(),
    })
}
