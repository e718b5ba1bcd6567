//! Registry of lightning payment endpoints ("zappers") keyed by pubkey.
//!
//! Profile metadata events (kind 0) advertise a lightning address; resolving
//! it against the LNURL service yields the callback and, crucially, the
//! pubkey the service signs zap receipts with. That record is the trust
//! anchor receipt validation checks against.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

use crate::config::Settings;
use crate::event::{Event, METADATA_KIND};
use crate::lnurl;

/// Capabilities advertised by an LNURL pay endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZapperInfo {
    /// Whether the service supports Nostr zaps at all.
    #[serde(default)]
    pub allows_nostr: bool,
    /// Pubkey the service signs zap receipts with.
    #[serde(default)]
    pub nostr_pubkey: Option<String>,
    /// Invoice request callback URL.
    pub callback: String,
    #[serde(default)]
    pub min_sendable: u64,
    #[serde(default)]
    pub max_sendable: u64,
}

/// Best known zapper for a recipient pubkey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZapperRecord {
    /// Recipient identity this record belongs to.
    pub pubkey: String,
    /// bech32-encoded LNURL of the pay endpoint, as carried in zap requests.
    pub lnurl: String,
    /// Invoice request callback URL.
    pub callback: String,
    pub min_sendable: u64,
    pub max_sendable: u64,
    /// Pubkey authorized to sign zap receipts for this recipient.
    pub nostr_pubkey: String,
    /// `created_at` of the metadata event that produced this record.
    pub created_at: u64,
    /// Wall clock time the record was resolved.
    pub updated_at: u64,
}

/// Resolves an LNURL pay endpoint URL to its advertised capabilities.
///
/// Injected so the network call stays outside this core; tests swap in a
/// canned implementation.
#[async_trait]
pub trait ZapperInfoFetcher: Send + Sync {
    async fn fetch(&self, lnurl: &str) -> Result<ZapperInfo>;
}

/// Fetcher that POSTs `{"lnurl": …}` to a capability-resolution endpoint.
pub struct HttpZapperInfoFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpZapperInfoFetcher {
    /// Fetcher against `url` with reqwest's default client settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetcher against the configured endpoint with the configured timeout.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.http_timeout_secs))
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            url: settings.zapper_info_url.clone(),
        })
    }
}

#[async_trait]
impl ZapperInfoFetcher for HttpZapperInfoFetcher {
    async fn fetch(&self, lnurl: &str) -> Result<ZapperInfo> {
        let res = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "lnurl": lnurl }))
            .send()
            .await
            .context("requesting zapper info")?
            .error_for_status()
            .context("zapper info status")?;
        res.json().await.context("parsing zapper info")
    }
}

/// Recognized profile metadata fields.
#[derive(Deserialize)]
struct Profile {
    #[serde(default)]
    lud16: Option<String>,
    #[serde(default)]
    lud06: Option<String>,
}

impl Profile {
    /// Lightning address, preferring the `lud16` form, lowercased.
    fn lightning_address(&self) -> Option<String> {
        [&self.lud16, &self.lud06]
            .into_iter()
            .flatten()
            .find(|a| !a.is_empty())
            .map(|a| a.to_lowercase())
    }
}

/// In-memory registry mapping recipient pubkeys to resolved zapper records.
///
/// The only shared mutable state in this crate. Records are superseded, never
/// deleted: a stored record is replaced only by ingesting a metadata event
/// with a strictly greater `created_at`, so duplicate or out-of-order
/// delivery is a no-op regardless of arrival order.
pub struct ZapperDirectory {
    zappers: RwLock<HashMap<String, ZapperRecord>>,
    fetcher: Arc<dyn ZapperInfoFetcher>,
    updates: broadcast::Sender<ZapperRecord>,
}

impl ZapperDirectory {
    pub fn new(fetcher: Arc<dyn ZapperInfoFetcher>) -> Self {
        let (updates, _) = broadcast::channel(64);
        Self {
            zappers: RwLock::new(HashMap::new()),
            fetcher,
            updates,
        }
    }

    /// Ingest a profile metadata event for its author.
    ///
    /// Resolution failures leave the directory unchanged; the author's
    /// metadata is only re-attempted when a newer metadata event arrives.
    pub async fn ingest(&self, event: &Event) {
        if let Err(e) = self.try_ingest(event).await {
            warn!(pubkey = %event.pubkey, "zapper ingestion failed: {e:#}");
        }
    }

    async fn try_ingest(&self, event: &Event) -> Result<()> {
        if event.kind != METADATA_KIND {
            return Ok(());
        }
        // Unparsable content and profiles without a lightning address are
        // ordinary on an open network, not errors.
        let Ok(profile) = serde_json::from_str::<Profile>(&event.content) else {
            return Ok(());
        };
        let Some(address) = profile.lightning_address() else {
            return Ok(());
        };
        if !self.newer_than_stored(&event.pubkey, event.created_at) {
            return Ok(());
        }

        let Some(endpoint) = lnurl::lnurl_endpoint(&address) else {
            bail!("unresolvable lightning address: {address}");
        };
        let info = self.fetcher.fetch(&endpoint).await.context("resolving")?;
        if !info.allows_nostr {
            bail!("endpoint does not allow nostr zaps");
        }
        let Some(nostr_pubkey) = info.nostr_pubkey else {
            bail!("endpoint advertises no signing pubkey");
        };

        self.commit(ZapperRecord {
            pubkey: event.pubkey.clone(),
            lnurl: lnurl::encode_lnurl(&endpoint)?,
            callback: info.callback,
            min_sendable: info.min_sendable,
            max_sendable: info.max_sendable,
            nostr_pubkey,
            created_at: event.created_at,
            updated_at: now(),
        });
        Ok(())
    }

    /// Current record for a recipient, if one has been resolved.
    pub fn lookup(&self, pubkey: &str) -> Option<ZapperRecord> {
        self.zappers.read().get(pubkey).cloned()
    }

    /// Subscribe to records as they are committed.
    pub fn subscribe(&self) -> broadcast::Receiver<ZapperRecord> {
        self.updates.subscribe()
    }

    fn newer_than_stored(&self, pubkey: &str, created_at: u64) -> bool {
        self.zappers
            .read()
            .get(pubkey)
            .map_or(true, |r| created_at > r.created_at)
    }

    /// The staleness check runs again under the write lock: the resolution
    /// call suspends between the pre-check and this point, and a concurrent
    /// ingest for the same pubkey may have committed a newer record meanwhile.
    fn commit(&self, record: ZapperRecord) {
        let mut zappers = self.zappers.write();
        if let Some(existing) = zappers.get(&record.pubkey) {
            if record.created_at <= existing.created_at {
                return;
            }
        }
        let _ = self.updates.send(record.clone());
        zappers.insert(record.pubkey.clone(), record);
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
