//! Envelope types exchanged between overlay peers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Network identity of a peer, in `host:port` form.
///
/// Opaque to this crate: no parsing or validation is done here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerAddress(String);

impl PeerAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for PeerAddress {
    fn from(addr: &str) -> Self {
        Self(addr.to_string())
    }
}

impl From<String> for PeerAddress {
    fn from(addr: String) -> Self {
        Self(addr)
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot mapping peers to their display names.
///
/// Ordered by address so that serialization is deterministic.
pub type Directory = BTreeMap<PeerAddress, String>;

/// Discriminator of an envelope, with its numeric wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Zero-valued kind carried by an envelope with no payload.
    Empty,
    Chat,
    UsernameDirectory,
    UsernameRequest,
}

impl MessageKind {
    /// Returns the wire tag for this kind.
    pub fn tag(&self) -> u64 {
        match self {
            MessageKind::Empty => 0,
            MessageKind::Chat => 1,
            MessageKind::UsernameDirectory => 2,
            MessageKind::UsernameRequest => 3,
        }
    }

    /// Maps a wire tag back to a kind, or `None` if the tag is unknown.
    pub fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            0 => Some(MessageKind::Empty),
            1 => Some(MessageKind::Chat),
            2 => Some(MessageKind::UsernameDirectory),
            3 => Some(MessageKind::UsernameRequest),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Empty => write!(f, "EMPTY"),
            MessageKind::Chat => write!(f, "CHAT"),
            MessageKind::UsernameDirectory => write!(f, "USERNAME_DIRECTORY"),
            MessageKind::UsernameRequest => write!(f, "USERNAME_REQUEST"),
        }
    }
}

/// A single overlay message.
///
/// Each variant carries only the payload meaningful for its kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Envelope {
    /// No payload.
    #[default]
    Empty,
    /// Free-text chat body.
    Chat { text: String },
    /// Known peers and their display names.
    UsernameDirectory(Directory),
    /// Asks the receiver for the display name of the given peer.
    UsernameRequest(PeerAddress),
}

impl Envelope {
    pub fn chat(text: impl Into<String>) -> Self {
        Envelope::Chat { text: text.into() }
    }

    /// Builds a directory envelope from any collection of address/name pairs.
    ///
    /// A later pair for the same address replaces an earlier one.
    pub fn username_directory<A, N, I>(entries: I) -> Self
    where
        A: Into<PeerAddress>,
        N: Into<String>,
        I: IntoIterator<Item = (A, N)>,
    {
        Envelope::UsernameDirectory(
            entries
                .into_iter()
                .map(|(addr, name)| (addr.into(), name.into()))
                .collect(),
        )
    }

    pub fn username_request(addr: impl Into<PeerAddress>) -> Self {
        Envelope::UsernameRequest(addr.into())
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Envelope::Empty => MessageKind::Empty,
            Envelope::Chat { .. } => MessageKind::Chat,
            Envelope::UsernameDirectory(_) => MessageKind::UsernameDirectory,
            Envelope::UsernameRequest(_) => MessageKind::UsernameRequest,
        }
    }
}
