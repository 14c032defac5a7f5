//! Lightning payment methods: BOLT11 invoices and BOLT12 offers.

use std::{borrow::Cow, str::FromStr};

use bech32::primitives::decode::UncheckedHrpstring;
use lightning_invoice::Bolt11Invoice;

use crate::network::Network;

/// BOLT11 decode failure, carrying the decoder's message.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct InvoiceError(pub String);

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum OfferError {
    #[error("missing 'ln' prefix")]
    MissingPrefix,
    #[error("invalid '+' continuation")]
    InvalidContinuation,
    #[error("{0}")]
    Bech32(String),
    #[error("unexpected human-readable part: expected 'lno'")]
    WrongHrp,
    #[error("empty offer")]
    Empty,
}

/// The BOLT12 offer HRP.
const OFFER_HRP: &str = "lno";

/// Decode a BOLT11 invoice and return the network it's bound to.
///
/// The invoice currency always decodes to some [`Network`]; currencies we
/// don't model (simnet) come back as [`Network::Unknown`].
pub fn classify_invoice(invoice: &str) -> Result<Network, InvoiceError> {
    let invoice = Bolt11Invoice::from_str(invoice)
        .map_err(|e| InvoiceError(e.to_string()))?;
    Ok(Network::from(invoice.currency()))
}

/// Check that a BOLT12 offer looks like one.
///
/// This only checks the `ln` prefix, `+` continuations, the `lno` HRP, and
/// that the data part is non-empty and uses the bech32 character set. The TLV
/// stream is never decoded, so e.g. `lno1zzzz` is accepted. Offers carry no
/// network.
pub fn classify_offer(offer: &str) -> Result<(), OfferError> {
    let has_ln_prefix = offer
        .as_bytes()
        .get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"ln"));
    if !has_ln_prefix {
        return Err(OfferError::MissingPrefix);
    }

    let offer = strip_continuations(offer)?;
    let parsed = UncheckedHrpstring::new(&offer)
        .map_err(|e| OfferError::Bech32(e.to_string()))?;
    if !parsed.hrp().as_str().eq_ignore_ascii_case(OFFER_HRP) {
        return Err(OfferError::WrongHrp);
    }

    // BOLT12 strings have no checksum, so the whole data part is payload.
    if parsed.data_part_ascii().is_empty() {
        return Err(OfferError::Empty);
    }
    Ok(())
}

/// BOLT12 lets long strings be split with `+`, optionally followed by
/// whitespace. Join the pieces back together.
fn strip_continuations(s: &str) -> Result<Cow<'_, str>, OfferError> {
    if !s.contains('+') {
        return Ok(Cow::Borrowed(s));
    }

    let mut joined = String::with_capacity(s.len());
    for (idx, chunk) in s.split('+').enumerate() {
        let chunk = if idx == 0 {
            chunk
        } else {
            chunk.trim_start_matches(char::is_whitespace)
        };
        if chunk.is_empty() {
            return Err(OfferError::InvalidContinuation);
        }
        joined.push_str(chunk);
    }
    Ok(Cow::Owned(joined))
}
