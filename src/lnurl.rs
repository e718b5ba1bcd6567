//! LNURL resolution: lightning addresses, bech32 encoding, well-known paths.

use anyhow::{bail, Context, Result};
use bech32::{Bech32, Hrp};

const LNURL_HRP: &str = "lnurl";

/// Resolve a lightning address or raw LNURL to its HTTPS endpoint URL.
///
/// `lnurl1…` strings are bech32-decoded to the URL they wrap; `name@domain`
/// addresses map to `https://domain/.well-known/lnurlp/name`. Anything else
/// is unresolvable.
pub fn lnurl_endpoint(address: &str) -> Option<String> {
    if address.starts_with("lnurl1") {
        return decode_lnurl(address).ok();
    }
    if let Some((name, domain)) = address.split_once('@') {
        if !name.is_empty() && !domain.is_empty() {
            return Some(format!("https://{domain}/.well-known/lnurlp/{name}"));
        }
    }
    None
}

/// Encode an endpoint URL as a bech32 `lnurl1…` string.
pub fn encode_lnurl(url: &str) -> Result<String> {
    let hrp = Hrp::parse(LNURL_HRP).context("lnurl prefix")?;
    bech32::encode::<Bech32>(hrp, url.as_bytes()).context("encoding lnurl")
}

/// Decode a bech32 `lnurl1…` string back to its endpoint URL.
pub fn decode_lnurl(encoded: &str) -> Result<String> {
    let (hrp, data) = bech32::decode(encoded).context("decoding lnurl")?;
    if hrp.as_str() != LNURL_HRP {
        bail!("unexpected bech32 prefix: {}", hrp);
    }
    String::from_utf8(data).context("lnurl payload is not utf-8")
}
