//! Decode error types and error kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error reported by a record format when parsing fails.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while turning received bytes back into an envelope.
///
/// Each variant corresponds to one stage of the decode pipeline and carries
/// the error reported by that stage.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is not a valid compressed block.
    #[error("corrupt compressed block: {0}")]
    Corrupt(#[source] std::io::Error),

    /// The decompressed bytes do not match the record layout.
    #[error("malformed record: {0}")]
    Malformed(#[source] BoxError),

    /// The record is well formed but its discriminator is not a known kind.
    #[error("unknown message kind: {0}")]
    UnknownKind(u64),
}

impl DecodeError {
    /// Builds a `Corrupt` error from a plain message.
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        DecodeError::Corrupt(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            msg.into(),
        ))
    }

    /// Builds a `Malformed` error from whatever the record format reported.
    pub fn malformed(source: impl Into<BoxError>) -> Self {
        DecodeError::Malformed(source.into())
    }

    /// Returns the sub-kind of this error.
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::Corrupt(_) => DecodeErrorKind::Corrupt,
            DecodeError::Malformed(_) => DecodeErrorKind::Malformed,
            DecodeError::UnknownKind(_) => DecodeErrorKind::UnknownKind,
        }
    }

    /// Returns whether the sender produced a valid compressed block that
    /// nonetheless breaks the envelope protocol.
    ///
    /// A corrupt block may just be damage in transit; the other kinds mean the
    /// peer speaks something we do not understand.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            DecodeError::Malformed(_) | DecodeError::UnknownKind(_)
        )
    }
}

/// Stable identifiers for decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecodeErrorKind {
    Corrupt,
    Malformed,
    UnknownKind,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::Corrupt => write!(f, "CORRUPT"),
            DecodeErrorKind::Malformed => write!(f, "MALFORMED"),
            DecodeErrorKind::UnknownKind => write!(f, "UNKNOWN_KIND"),
        }
    }
}
