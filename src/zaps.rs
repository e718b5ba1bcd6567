//! Zap receipt validation.
//!
//! Receipts arrive from an open, adversarial network: a candidate that fails
//! any check simply does not appear in the output. The validator never
//! mutates the directory and holds no state of its own, so it can be called
//! from any context.

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::lightning::invoice_amount;
use crate::tags::Tags;
use crate::zapper::{ZapperDirectory, ZapperRecord};

/// A zap receipt that passed every validation check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifiedZap {
    /// The receipt event as received.
    pub receipt: Event,
    /// Amount decoded from the receipt's bolt11 invoice, in millisatoshis.
    pub invoice_amount: u64,
    /// The zap request embedded in the receipt's description tag.
    pub request: Event,
}

/// Filter candidate zap receipts down to those consistent with the
/// recipient's known zapper.
///
/// Returns an empty list when no zapper record exists for `recipient`; a
/// receipt cannot be validated without a trust anchor. Total over arbitrary
/// input: nothing here errors, candidates just drop out.
pub fn validate_zaps(
    directory: &ZapperDirectory,
    receipts: &[Event],
    recipient: &str,
) -> Vec<VerifiedZap> {
    let Some(zapper) = directory.lookup(recipient) else {
        return Vec::new();
    };
    receipts
        .iter()
        .filter_map(|receipt| verify_receipt(receipt, recipient, &zapper))
        .collect()
}

fn verify_receipt(receipt: &Event, recipient: &str, zapper: &ZapperRecord) -> Option<VerifiedZap> {
    let meta = Tags::from_event(receipt).as_meta();
    let invoice_amount = invoice_amount(meta.get("bolt11")?)?;
    let request: Event = serde_json::from_str(meta.get("description")?).ok()?;

    // Zaps the recipient sent to themselves don't count.
    if request.pubkey == recipient {
        return None;
    }

    let req_meta = Tags::from_event(&request).as_meta();

    // A declared amount must match what the invoice actually asks for.
    if let Some(amount) = req_meta.get("amount") {
        if amount.parse::<u64>().ok() != Some(invoice_amount) {
            return None;
        }
    }

    // A declared lnurl must name the recipient's own pay endpoint.
    if let Some(lnurl) = req_meta.get("lnurl") {
        if lnurl != &zapper.lnurl {
            return None;
        }
    }

    // Only the service the recipient's profile points at may sign receipts.
    if receipt.pubkey != zapper.nostr_pubkey {
        return None;
    }

    Some(VerifiedZap {
        receipt: receipt.clone(),
        invoice_amount,
        request,
    })
}

/// Sum of verified amounts, for display totals.
pub fn total_msats(zaps: &[VerifiedZap]) -> u64 {
    zaps.iter().map(|z| z.invoice_amount).sum()
}
