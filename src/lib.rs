//! Core validation and indexing for Nostr events and NIP-57 zaps.
//!
//! Events arriving from relays are loosely typed: tags are arrays of strings
//! whose meaning depends on their first element, and zap receipts embed a
//! JSON-serialized zap request inside a tag. This crate provides a chainable
//! query view over tag lists ([`Tags`]), thread reply/root resolution, an
//! in-memory registry of lightning payment endpoints per pubkey
//! ([`ZapperDirectory`]), and a validation pipeline that filters forged or
//! inconsistent zap receipts down to [`VerifiedZap`] records.
//!
//! Network transport, signature verification, and payment itself are out of
//! scope; the external LNURL capability lookup is injected via
//! [`zapper::ZapperInfoFetcher`].

pub mod config;
pub mod event;
pub mod lightning;
pub mod lnurl;
pub mod reply;
pub mod tags;
pub mod zapper;
pub mod zaps;

pub use config::Settings;
pub use event::{Event, Tag};
pub use reply::{find_reply_and_root, EventRef, ReplyRefs};
pub use tags::Tags;
pub use zapper::{ZapperDirectory, ZapperInfoFetcher, ZapperRecord};
pub use zaps::{validate_zaps, VerifiedZap};
