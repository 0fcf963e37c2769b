//! Envelope codec: structural serialization followed by compression.

use crate::compression::{Compression, Zlib};
use crate::config::CodecConfig;
use crate::error::DecodeError;
use crate::format::{JsonFormat, RecordFormat, WireRecord};
use crate::message::Envelope;
use bytes::Bytes;

/// Two-stage envelope pipeline.
///
/// Encoding serializes the envelope with `F` and compresses the record with
/// `C`; decoding runs the inverse stages. A codec holds no per-call state and
/// can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Codec<F = JsonFormat, C = Zlib> {
    format: F,
    compression: C,
}

impl Codec {
    /// Creates the default JSON + zlib codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a JSON + zlib codec from configuration.
    pub fn from_config(config: &CodecConfig) -> Self {
        Self::with_parts(
            JsonFormat,
            Zlib::new(config.compression_level).with_max_record_size(config.max_record_size),
        )
    }
}

impl<F: RecordFormat, C: Compression> Codec<F, C> {
    /// Creates a codec from explicit stages.
    pub fn with_parts(format: F, compression: C) -> Self {
        Self {
            format,
            compression,
        }
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn compression(&self) -> &C {
        &self.compression
    }

    /// Encodes an envelope for transmission.
    pub fn encode(&self, envelope: &Envelope) -> Bytes {
        let record = self.format.serialize(&WireRecord::from(envelope));
        let block = self.compression.compress(&record);
        tracing::trace!(
            kind = %envelope.kind(),
            record_len = record.len(),
            block_len = block.len(),
            "Encoded envelope"
        );
        Bytes::from(block)
    }

    /// Decodes received bytes into a fresh envelope.
    pub fn decode(&self, bytes: &[u8]) -> Result<Envelope, DecodeError> {
        let result = self.decode_stages(bytes);
        match &result {
            Ok(envelope) => tracing::trace!(
                kind = %envelope.kind(),
                block_len = bytes.len(),
                "Decoded envelope"
            ),
            Err(e) => tracing::debug!(
                stage = %e.kind(),
                block_len = bytes.len(),
                error = %e,
                "Failed to decode envelope"
            ),
        }
        result
    }

    fn decode_stages(&self, bytes: &[u8]) -> Result<Envelope, DecodeError> {
        let record = self.compression.decompress(bytes)?;
        let record = self.format.parse(&record)?;
        record.into_envelope()
    }
}

/// Encodes an envelope with the default codec.
pub fn encode(envelope: &Envelope) -> Bytes {
    Codec::new().encode(envelope)
}

/// Decodes bytes with the default codec.
pub fn decode(bytes: &[u8]) -> Result<Envelope, DecodeError> {
    Codec::new().decode(bytes)
}
