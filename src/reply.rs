//! Thread reply and root resolution from `e` tags.
//!
//! Two tagging conventions exist in the wild: the deprecated positional one,
//! where the last `e` tag is the reply and the first is the root, and the
//! marked one, where tags carry a trailing `"reply"`/`"root"` marker.

use serde::{Deserialize, Serialize};

use crate::event::{Event, Tag};
use crate::tags::Tags;

/// Reference to another event extracted from an `e` tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRef {
    /// Referenced event id.
    pub id: String,
    /// Relay hint carried in the tag, when present and non-empty.
    pub relay: Option<String>,
}

impl EventRef {
    fn from_tag(tag: &Tag) -> Option<Self> {
        Some(EventRef {
            id: tag.value()?.to_string(),
            relay: tag.0.get(2).filter(|r| !r.is_empty()).cloned(),
        })
    }
}

/// The pair of thread references an event carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyRefs {
    /// Event this one directly replies to.
    pub reply: Option<EventRef>,
    /// Root of the thread.
    pub root: Option<EventRef>,
}

/// Resolve the reply and root references of an event.
///
/// `e` tags marked `"mention"` are never thread references. If any remaining
/// tag lacks a recognized marker the whole set is treated as the deprecated
/// positional convention; otherwise markers are authoritative and a missing
/// reply marker falls back to the root.
pub fn find_reply_and_root(event: &Event) -> ReplyRefs {
    let tags = Tags::from_event(event)
        .of_type("e")
        .reject(|t| t.last() == Some("mention"));
    let legacy = tags.any(|t| !matches!(t.last(), Some("reply") | Some("root")));

    if legacy {
        let reply = tags.last().and_then(EventRef::from_tag);
        let root = if tags.count() > 1 {
            tags.first().and_then(EventRef::from_tag)
        } else {
            None
        };
        return ReplyRefs { reply, root };
    }

    let reply = tags.mark("reply").first().and_then(EventRef::from_tag);
    let root = tags.mark("root").first().and_then(EventRef::from_tag);
    ReplyRefs {
        reply: reply.or_else(|| root.clone()),
        root,
    }
}

/// Id of the event this one replies to, if any.
pub fn find_reply_id(event: &Event) -> Option<String> {
    find_reply_and_root(event).reply.map(|r| r.id)
}

/// Id of the thread root, if any.
pub fn find_root_id(event: &Event) -> Option<String> {
    find_reply_and_root(event).root.map(|r| r.id)
}
