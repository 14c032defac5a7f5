//! Proof-of-payment callback validation.

use crate::uri;

/// Schemes a wallet must never hand a proof-of-payment to.
const FORBIDDEN_SCHEMES: [&str; 5] =
    ["http", "https", "file", "javascript", "mailto"];

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("Forbidden pop scheme: {0}")]
pub struct PopError(pub String);

/// Validate a raw (percent-encoded) `pop` / `req-pop` value.
///
/// A value without a leading URI scheme is fine; pop callbacks don't need to
/// be URIs.
pub fn validate_pop(raw: &str) -> Result<(), PopError> {
    let decoded = uri::percent_decode(raw);
    match leading_scheme(&decoded) {
        Some(scheme)
            if FORBIDDEN_SCHEMES
                .iter()
                .any(|forbidden| forbidden.eq_ignore_ascii_case(scheme)) =>
            Err(PopError(scheme.to_owned())),
        _ => Ok(()),
    }
}

/// Returns the leading `[A-Za-z][A-Za-z0-9+.-]*` token of `s`, if any.
fn leading_scheme(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }
    let len = bytes
        .iter()
        .position(|&b| !(b.is_ascii_alphanumeric() || b"+.-".contains(&b)))
        .unwrap_or(bytes.len());
    Some(&s[..len])
}
