// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Photo payload compression down to a byte budget
//!
//! Payloads over the budget are re-encoded as JPEG, starting at quality 80
//! and stepping down by 10 until the result fits or quality 10 is reached.

use nl_core::Payload;
use std::sync::Arc;
use thiserror::Error;

/// First rung of the quality ladder, in tenths
const START_QUALITY_TENTHS: u8 = 8;
/// Last rung of the quality ladder, in tenths
const FLOOR_QUALITY_TENTHS: u8 = 1;

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("payload could not be decoded as an image: {0}")]
    Decode(String),
    #[error("image could not be encoded: {0}")]
    Encode(String),
}

/// Re-encodes an image payload at a given quality (1-100).
///
/// Implementations must be deterministic: the same input and quality
/// always produce the same bytes.
pub trait PayloadEncoder: Send + Sync + 'static {
    fn encode(&self, bytes: &[u8], quality: u8) -> Result<Vec<u8>, CompressError>;
}

/// JPEG re-encoder backed by the `image` crate
#[derive(Clone, Copy, Debug, Default)]
pub struct JpegEncoder;

impl PayloadEncoder for JpegEncoder {
    fn encode(&self, bytes: &[u8], quality: u8) -> Result<Vec<u8>, CompressError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| CompressError::Decode(e.to_string()))?;
        let rgb = decoded.to_rgb8();

        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
            .encode_image(&rgb)
            .map_err(|e| CompressError::Encode(e.to_string()))?;
        Ok(out)
    }
}

/// Outcome of one compression
#[derive(Debug, Clone, PartialEq)]
pub struct Compressed {
    pub payload: Payload,
    /// Quality of the kept re-encoding, `None` if the input was kept
    pub quality: Option<u8>,
    pub within_budget: bool,
}

/// Caps payload size by walking the quality ladder
#[derive(Clone)]
pub struct PayloadCompressor {
    encoder: Arc<dyn PayloadEncoder>,
    max_bytes: usize,
}

impl PayloadCompressor {
    pub fn new(encoder: impl PayloadEncoder, max_bytes: usize) -> Self {
        Self {
            encoder: Arc::new(encoder),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Shrink `payload` to the budget where possible.
    ///
    /// The result is never larger than the input. Payloads already within
    /// budget are returned unchanged.
    pub fn compress(&self, payload: Payload) -> Compressed {
        let original_len = payload.len();
        if original_len <= self.max_bytes {
            return Compressed {
                payload,
                quality: None,
                within_budget: true,
            };
        }

        let mut tenths = START_QUALITY_TENTHS;
        let encoded = loop {
            let quality = tenths * 10;
            let bytes = match self.encoder.encode(payload.as_bytes(), quality) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(
                        size = original_len,
                        budget = self.max_bytes,
                        error = %e,
                        "storing payload uncompressed"
                    );
                    return Compressed {
                        payload,
                        quality: None,
                        within_budget: false,
                    };
                }
            };

            tracing::debug!(quality, size = bytes.len(), "encoded payload");
            if bytes.len() <= self.max_bytes || tenths <= FLOOR_QUALITY_TENTHS {
                break (bytes, quality);
            }
            tenths -= 1;
        };

        let (bytes, quality) = encoded;
        let result = if bytes.len() < original_len {
            Compressed {
                within_budget: bytes.len() <= self.max_bytes,
                payload: Payload::new(bytes),
                quality: Some(quality),
            }
        } else {
            Compressed {
                payload,
                quality: None,
                within_budget: false,
            }
        };

        if result.within_budget {
            tracing::info!(
                from = original_len,
                to = result.payload.len(),
                quality,
                "payload compressed"
            );
        } else {
            tracing::warn!(
                from = original_len,
                to = result.payload.len(),
                budget = self.max_bytes,
                "payload still over budget at lowest quality"
            );
        }
        result
    }
}

impl std::fmt::Debug for PayloadCompressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadCompressor")
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeEncoder;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    #![cfg_attr(coverage_nightly, coverage(off))]

    use super::{CompressError, PayloadEncoder};
    use std::sync::{Arc, Mutex};

    /// Encoder whose output size is `input * quality / 100`
    #[derive(Clone, Default)]
    pub struct FakeEncoder {
        qualities: Arc<Mutex<Vec<u8>>>,
        undecodable: bool,
    }

    impl FakeEncoder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Encoder that rejects every payload as undecodable
        pub fn undecodable() -> Self {
            Self {
                undecodable: true,
                ..Self::default()
            }
        }

        /// Qualities requested so far, in order
        pub fn qualities(&self) -> Vec<u8> {
            self.qualities
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }
    }

    impl PayloadEncoder for FakeEncoder {
        fn encode(&self, bytes: &[u8], quality: u8) -> Result<Vec<u8>, CompressError> {
            self.qualities
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(quality);
            if self.undecodable {
                return Err(CompressError::Decode("not an image".to_string()));
            }
            let len = bytes.len() * usize::from(quality) / 100;
            Ok(vec![0xD8; len])
        }
    }
}

#[cfg(test)]
#[path = "compress_tests.rs"]
mod tests;
