//! Structural record format.
//!
//! An envelope is flattened into a self-describing JSON record before
//! compression:
//!
//! ```text
//! {"type":2,"body":"","usernames":{"172.16.0.17:9999":"Server-2","192.168.0.10:9999":"Server-1"}}\n
//! ```
//!
//! `usernames` is `null` for every kind except the username directory, whose
//! entries are always emitted sorted by address. The trailing newline keeps the
//! record byte-compatible with older peers.

use crate::error::DecodeError;
use crate::message::{Directory, Envelope, MessageKind, PeerAddress};
use serde::{Deserialize, Serialize};

/// Flat wire form of an [`Envelope`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    /// Raw discriminator. Kept wider than any known tag so that an
    /// unrecognized value reaches kind validation instead of failing parsing.
    #[serde(rename = "type")]
    pub kind: u64,

    /// Chat text or the queried address.
    #[serde(default)]
    pub body: String,

    /// Directory entries, `None` unless the kind is a username directory.
    #[serde(default)]
    pub usernames: Option<Directory>,
}

impl From<&Envelope> for WireRecord {
    fn from(envelope: &Envelope) -> Self {
        let kind = envelope.kind().tag();
        match envelope {
            Envelope::Empty => Self {
                kind,
                ..Default::default()
            },
            Envelope::Chat { text } => Self {
                kind,
                body: text.clone(),
                usernames: None,
            },
            Envelope::UsernameDirectory(directory) => Self {
                kind,
                body: String::new(),
                usernames: Some(directory.clone()),
            },
            Envelope::UsernameRequest(addr) => Self {
                kind,
                body: addr.as_str().to_string(),
                usernames: None,
            },
        }
    }
}

impl WireRecord {
    /// Validates the discriminator and rebuilds the envelope.
    ///
    /// Only the field meaningful for the declared kind is kept; anything else
    /// the sender filled in is dropped.
    pub fn into_envelope(self) -> Result<Envelope, DecodeError> {
        let kind = MessageKind::from_tag(self.kind).ok_or(DecodeError::UnknownKind(self.kind))?;

        let stray_body = !self.body.is_empty()
            && matches!(kind, MessageKind::Empty | MessageKind::UsernameDirectory);
        let stray_usernames = self.usernames.as_ref().is_some_and(|d| !d.is_empty())
            && kind != MessageKind::UsernameDirectory;
        if stray_body || stray_usernames {
            tracing::debug!(
                %kind,
                stray_body,
                stray_usernames,
                "Discarding record fields not carried by message kind"
            );
        }

        let envelope = match kind {
            MessageKind::Empty => Envelope::Empty,
            MessageKind::Chat => Envelope::Chat { text: self.body },
            MessageKind::UsernameDirectory => {
                Envelope::UsernameDirectory(self.usernames.unwrap_or_default())
            }
            MessageKind::UsernameRequest => Envelope::UsernameRequest(PeerAddress::new(self.body)),
        };
        Ok(envelope)
    }
}

/// Turns records into bytes and back.
pub trait RecordFormat {
    /// Serializes a record. Structurally equal records yield identical bytes.
    fn serialize(&self, record: &WireRecord) -> Vec<u8>;

    /// Parses a record, failing with [`DecodeError::Malformed`].
    fn parse(&self, bytes: &[u8]) -> Result<WireRecord, DecodeError>;
}

/// Newline-terminated JSON records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl RecordFormat for JsonFormat {
    fn serialize(&self, record: &WireRecord) -> Vec<u8> {
        // Only string keys and plain values, so serde_json cannot fail here.
        let mut bytes = serde_json::to_vec(record).expect("wire record is always serializable");
        bytes.push(b'\n');
        bytes
    }

    fn parse(&self, bytes: &[u8]) -> Result<WireRecord, DecodeError> {
        serde_json::from_slice(bytes).map_err(DecodeError::malformed)
    }
}
