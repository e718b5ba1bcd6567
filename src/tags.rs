//! Chainable query views over event tag lists.

use std::collections::{HashMap, HashSet};

use url::Url;

use crate::event::{Event, Tag};

/// Immutable query view over a sequence of tags.
///
/// Every filtering or projecting operation returns a new view and leaves the
/// source untouched, so lookups compose:
///
/// ```
/// use zapstr::event::Tag;
/// use zapstr::Tags;
///
/// let tags = Tags::wrap(vec![
///     Tag::new(["p", "aa11"]),
///     Tag::new(["e", "bb22", "", "reply"]),
/// ]);
/// assert_eq!(tags.of_type("p").values().first(), Some("aa11"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Wrap an already-extracted tag sequence, discarding empty tags.
    pub fn wrap(tags: Vec<Tag>) -> Self {
        Tags(tags.into_iter().filter(|t| !t.is_empty()).collect())
    }

    /// View over a single event's tags.
    pub fn from_event(event: &Event) -> Self {
        Self::wrap(event.tags.clone())
    }

    /// View over several events' tags, flattened in event order with each
    /// event's tag order preserved.
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        Self::wrap(
            events
                .into_iter()
                .flat_map(|e| e.tags.iter().cloned())
                .collect(),
        )
    }

    /// All tags in the current view.
    pub fn all(&self) -> &[Tag] {
        &self.0
    }

    /// Consume the view, yielding its tags.
    pub fn into_vec(self) -> Vec<Tag> {
        self.0
    }

    /// Number of tags in the view.
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Whether the view holds any tags.
    pub fn exists(&self) -> bool {
        !self.0.is_empty()
    }

    /// First tag, if any.
    pub fn first(&self) -> Option<&Tag> {
        self.0.first()
    }

    /// Last tag, if any.
    pub fn last(&self) -> Option<&Tag> {
        self.0.last()
    }

    /// Tag at position `i`; out of range yields `None`.
    pub fn nth(&self, i: usize) -> Option<&Tag> {
        self.0.get(i)
    }

    /// Tags whose type discriminator is `t`, in original relative order.
    pub fn of_type(&self, t: &str) -> Tags {
        self.of_types(&[t])
    }

    /// Tags whose type discriminator is any of `types`.
    pub fn of_types(&self, types: &[&str]) -> Tags {
        self.filter(|tag| tag.name().map_or(false, |n| types.contains(&n)))
    }

    /// Tags whose primary value equals `value`.
    pub fn equals(&self, value: &str) -> Tags {
        self.filter(|tag| tag.value() == Some(value))
    }

    /// Tags whose last element equals the given marker.
    pub fn mark(&self, marker: &str) -> Tags {
        self.marks(&[marker])
    }

    /// Tags whose last element equals any of the given markers.
    pub fn marks(&self, markers: &[&str]) -> Tags {
        self.filter(|tag| tag.last().map_or(false, |m| markers.contains(&m)))
    }

    /// Project each tag to its primary value, skipping tags without one.
    pub fn values(&self) -> Values {
        Values(
            self.0
                .iter()
                .filter_map(|tag| tag.value().map(str::to_string))
                .collect(),
        )
    }

    /// Project each tag by removing its first `n` elements.
    pub fn drop_first(&self, n: usize) -> Tags {
        Tags(
            self.0
                .iter()
                .map(|Tag(fields)| Tag(fields.iter().skip(n).cloned().collect()))
                .collect(),
        )
    }

    /// Tags matching the predicate.
    pub fn filter(&self, pred: impl Fn(&Tag) -> bool) -> Tags {
        Tags(self.0.iter().filter(|t| pred(t)).cloned().collect())
    }

    /// Tags not matching the predicate.
    pub fn reject(&self, pred: impl Fn(&Tag) -> bool) -> Tags {
        self.filter(|t| !pred(t))
    }

    /// Whether any tag matches the predicate.
    pub fn any(&self, pred: impl Fn(&Tag) -> bool) -> bool {
        self.0.iter().any(|t| pred(t))
    }

    /// Collapse the view into a type → value mapping.
    ///
    /// Later tags overwrite earlier ones on duplicate types, and tags with
    /// fewer than two elements are skipped.
    pub fn as_meta(&self) -> HashMap<String, String> {
        let mut meta = HashMap::new();
        for tag in &self.0 {
            if let (Some(name), Some(value)) = (tag.name(), tag.value()) {
                meta.insert(name.to_string(), value.to_string());
            }
        }
        meta
    }

    /// First primary value among tags of type `t`.
    pub fn get_meta(&self, t: &str) -> Option<String> {
        self.of_type(t).values().first().map(str::to_string)
    }

    /// Values of all `p` tags (referenced pubkeys).
    pub fn pubkeys(&self) -> Vec<String> {
        self.of_type("p").values().into_vec()
    }

    /// Values of all `r` tags (referenced URLs).
    pub fn urls(&self) -> Vec<String> {
        self.of_type("r").values().into_vec()
    }

    /// Values of all `t` tags with any leading `#` stripped, tolerating the
    /// older convention of tagging topics as hashtags.
    pub fn topics(&self) -> Vec<String> {
        self.of_type("t")
            .values()
            .into_vec()
            .into_iter()
            .map(|t| t.strip_prefix('#').unwrap_or(&t).to_string())
            .collect()
    }

    /// Every element across the whole view that looks like a shareable relay
    /// URL, deduplicated with first-occurrence order kept.
    pub fn relays(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.0
            .iter()
            .flat_map(|Tag(fields)| fields.iter())
            .filter(|s| is_shareable_relay(s))
            .filter(|s| seen.insert(s.to_string()))
            .cloned()
            .collect()
    }
}

/// Scalar view produced by [`Tags::values`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Values(Vec<String>);

impl Values {
    /// All values in the view.
    pub fn all(&self) -> &[String] {
        &self.0
    }

    /// Consume the view, yielding its values.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Number of values.
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Whether the view holds any values.
    pub fn exists(&self) -> bool {
        !self.0.is_empty()
    }

    /// First value, if any.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Last value, if any.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Value at position `i`; out of range yields `None`.
    pub fn nth(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(String::as_str)
    }
}

/// Whether a string qualifies as a relay URL worth sharing with others.
///
/// Requires a single `wss://` scheme occurrence, no whitespace, no explicit
/// port, no raw IPv4 literal, and no `/npub` path segment (virtual per-user
/// relay addressing).
pub fn is_shareable_relay(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("wss://") else {
        return false;
    };
    if rest.is_empty() || url.matches("://").count() != 1 {
        return false;
    }
    if url.chars().any(char::is_whitespace) {
        return false;
    }
    !has_port(rest) && !has_ipv4_octets(rest) && !rest.contains("/npub")
}

/// A `:` immediately followed by a digit anywhere after the scheme.
fn has_port(s: &str) -> bool {
    s.as_bytes()
        .windows(2)
        .any(|w| w[0] == b':' && w[1].is_ascii_digit())
}

/// Four dot-separated digit runs anywhere in the string.
fn has_ipv4_octets(s: &str) -> bool {
    s.split(|c: char| !c.is_ascii_digit() && c != '.').any(|run| {
        let groups: Vec<&str> = run.split('.').collect();
        groups.windows(4).any(|w| w.iter().all(|g| !g.is_empty()))
    })
}

/// Coerce a relay URL to a canonical `wss://` form: lowercased, trailing
/// slashes trimmed. Returns an empty string when the input cannot be parsed
/// as a URL at all.
pub fn normalize_relay_url(url: &str) -> String {
    let url = if url.starts_with("wss://") {
        url.to_string()
    } else {
        let stripped = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
        format!("wss://{stripped}")
    };
    match Url::parse(&url) {
        Ok(parsed) => parsed
            .as_str()
            .trim_end_matches('/')
            .to_ascii_lowercase(),
        Err(_) => String::new(),
    }
}
