//! BOLT11 invoice amount extraction.

/// Millisatoshis per whole bitcoin.
const MSAT_PER_BTC: u64 = 100_000_000_000;

/// Decode the payable amount of a BOLT11 invoice, in millisatoshis.
///
/// Only the human-readable part is inspected: `ln`, a currency prefix, an
/// optional amount, and an optional multiplier (`m`/`u`/`n`/`p`). Amountless
/// or malformed invoices yield `None`. `p` amounts not divisible by ten
/// would encode a fraction of a millisatoshi and are invalid.
pub fn invoice_amount(bolt11: &str) -> Option<u64> {
    let lower = bolt11.to_ascii_lowercase();
    // The data part never contains '1', so the last '1' separates the hrp.
    let hrp = &lower[..lower.rfind('1')?];
    let rest = hrp.strip_prefix("ln")?;
    let amount_start = rest.find(|c: char| c.is_ascii_digit())?;
    let amount = &rest[amount_start..];

    let (digits, multiplier) = match amount.find(|c: char| !c.is_ascii_digit()) {
        Some(i) if i == amount.len() - 1 => (&amount[..i], amount.chars().last()),
        Some(_) => return None,
        None => (amount, None),
    };
    let value: u64 = digits.parse().ok()?;

    match multiplier {
        None => value.checked_mul(MSAT_PER_BTC),
        Some('m') => value.checked_mul(MSAT_PER_BTC / 1_000),
        Some('u') => value.checked_mul(MSAT_PER_BTC / 1_000_000),
        Some('n') => value.checked_mul(MSAT_PER_BTC / 1_000_000_000),
        Some('p') => (value % 10 == 0).then(|| value / 10),
        Some(_) => None,
    }
}
