//! # gossip-protocol
//!
//! Wire envelope for the gossip chat overlay.
//!
//! This crate provides:
//! - The [`Envelope`] sum type carrying chat text, username directories and
//!   username lookups between peers
//! - A self-describing JSON record format with deterministic key ordering
//! - A zlib compression stage wrapping the record
//! - The [`Codec`] pipeline tying both stages together, plus decode error kinds
//!
//! Transport, peer discovery and message routing live outside this crate: a
//! producer hands a populated [`Envelope`] to [`encode`], a receiver hands the
//! received bytes to [`decode`] and dispatches on [`Envelope::kind`].

pub mod codec;
pub mod compression;
pub mod config;
pub mod error;
pub mod format;
pub mod message;

pub use codec::{decode, encode, Codec};
pub use compression::{Compression, Uncompressed, Zlib};
pub use config::{CodecConfig, ConfigError};
pub use error::{BoxError, DecodeError, DecodeErrorKind};
pub use format::{JsonFormat, RecordFormat, WireRecord};
pub use message::{Directory, Envelope, MessageKind, PeerAddress};

/// Default zlib compression level (matches zlib's own default).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Maximum size of a decompressed record (16 MiB).
pub const MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;
