//! Parse, validate, and encode [BIP321] `bitcoin:` payment URIs.
//!
//! A BIP321 URI can carry several alternative ways to pay the same request:
//! an onchain address in the URI body, network-scoped onchain addresses
//! (`bc`, `tb`, `bcrt`, `tbs`), BOLT11 invoices (`lightning`), BOLT12 offers
//! (`lno`), silent payment addresses (`sp`), and ark addresses (`ark`).
//!
//! [`parse`] classifies every one of them and reports every problem it finds
//! in a single [`ParseResult`], instead of stopping at the first. [`encode`]
//! goes the other way and checks its own output with the parser.
//!
//! ```
//! let result = bip321::parse("bitcoin:1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa?amount=0.5");
//! assert!(result.is_valid);
//! assert_eq!(result.network, Some(bip321::Network::Mainnet));
//! ```
//!
//! [BIP321]: https://github.com/bitcoin/bips/blob/master/bip-0321.mediawiki

// `proptest_derive::Arbitrary` issue.
// See: <https://github.com/proptest-rs/proptest/issues/447>
#![allow(non_local_definitions)]

/// Export all public types so they are accessible via the crate root.
/// The containing modules are used only for internal organization, and are
/// intentionally private so crate users have a simple, flat namespace.
pub use crate::{
    address::AddressError,
    ark::ArkError,
    bip321_uri::{ParseOptions, ParseResult},
    encode::{EncodeRequest, Encoded, ParamValue, Pop, encode},
    error::{EncodeError, ParseError},
    helpers::Bech32mError,
    lightning::{InvoiceError, OfferError},
    network::Network,
    payment_method::{PaymentMethod, PaymentMethodKind},
    pop::PopError,
    silent_payment::SilentPaymentError,
};

/// Onchain address classification.
mod address;
/// Ark address classification.
mod ark;
/// The parse orchestrator and [`ParseResult`].
mod bip321_uri;
/// The URI encoder.
mod encode;
/// Error types.
mod error;
/// Shared bech32m helpers.
mod helpers;
/// BOLT11 invoice and BOLT12 offer classification.
mod lightning;
/// [`Network`] and network compatibility rules.
mod network;
/// [`PaymentMethod`] and [`PaymentMethodKind`].
mod payment_method;
/// Proof-of-payment callback validation.
mod pop;
/// Silent payment address classification.
mod silent_payment;
/// Low level URI building blocks: `Uri`, `UriParam`, `UriParamKey`
mod uri;

/// Parse a BIP321 URI with the default [`ParseOptions`].
pub fn parse(s: &str) -> ParseResult {
    ParseResult::parse(s)
}

/// Parse a BIP321 URI, requiring payment methods to match `options`.
pub fn parse_with(s: &str, options: &ParseOptions) -> ParseResult {
    ParseResult::parse_with(s, options)
}

/// Validators for the individual payment method formats, for callers that
/// need to check a single value outside of a URI.
pub mod classify {
    pub use crate::{
        address::classify as address,
        ark::classify as ark,
        lightning::{classify_invoice as invoice, classify_offer as offer},
        pop::validate_pop as pop,
        silent_payment::classify as silent_payment,
    };
}
