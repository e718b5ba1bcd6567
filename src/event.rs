//! Nostr event model.

use serde::{Deserialize, Serialize};

/// Kind number of profile metadata events (JSON content with `lud16`/`lud06`).
pub const METADATA_KIND: u32 = 0;

/// Kind number of zap request events, embedded in receipts as a description.
pub const ZAP_REQUEST_KIND: u32 = 9734;

/// Kind number of zap receipt events published by payment services.
pub const ZAP_RECEIPT_KIND: u32 = 9735;

/// Wrapper for a Nostr tag expressed as an array of strings.
///
/// The first element denotes the tag type and the remaining elements hold
/// type-specific data. Arity varies: a `["p", "<pubkey>"]` tag carries one
/// value, while `["e", "<id>", "<relay>", "reply"]` carries a value, a relay
/// hint, and a trailing marker. There is no fixed schema, so each tag is
/// stored verbatim and unknown tag types round-trip losslessly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Build a tag from string-ish parts.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tag(parts.into_iter().map(Into::into).collect())
    }

    /// The tag's type discriminator (position 0).
    pub fn name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The tag's primary value (position 1).
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    /// The tag's final element, which carries the marker on relational tags.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Whether the tag has no elements at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A Nostr event as delivered by relays.
///
/// ```json
/// {
///   "id": "aa11",
///   "pubkey": "9630f4...",
///   "kind": 9735,
///   "created_at": 1700000000,
///   "tags": [["bolt11", "lnbc10n1..."], ["description", "{...}"]],
///   "content": "",
///   "sig": "deadbeef"
/// }
/// ```
///
/// Signatures are assumed to have been verified upstream; this crate never
/// checks `sig` itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Event identifier (hex of SHA-256 hash).
    pub id: String,
    /// Author public key (hex).
    pub pubkey: String,
    /// Kind number, e.g. `0` or `9735`.
    pub kind: u32,
    /// Unix timestamp of creation.
    pub created_at: u64,
    /// Ordered tag list; order is significant for reply resolution.
    pub tags: Vec<Tag>,
    /// Event content body, often JSON.
    pub content: String,
    /// Schnorr signature over the event hash (carried, never verified here).
    pub sig: String,
}
