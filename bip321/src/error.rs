use std::fmt;

use serde::{Serialize, Serializer};

use crate::{
    address::AddressError,
    ark::ArkError,
    lightning::{InvoiceError, OfferError},
    network::Network,
    payment_method::PaymentMethodKind,
    pop::PopError,
    silent_payment::SilentPaymentError,
};

/// A single problem found while parsing a BIP321 URI.
///
/// The parser never stops at the first problem. Every condition it detects is
/// recorded in [`ParseResult::errors`] in the order it was found; some of them
/// also mark the whole result invalid.
///
/// [`ParseResult::errors`]: crate::ParseResult::errors
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid URI scheme: expected 'bitcoin:'")]
    MalformedScheme,
    #[error("Empty payment URI")]
    EmptyInput,
    #[error("Invalid onchain address: {0}")]
    InvalidAddress(#[from] AddressError),
    /// A `bc`/`tb`/`bcrt`/`tbs` param held an address for another network.
    #[error("Address network mismatch: expected {expected}, found {found}")]
    AddressNetworkMismatch { expected: Network, found: Network },
    /// A payment method doesn't match the caller's expected network.
    #[error(
        "Network mismatch for {kind} payment method: \
         expected {expected}, found {found}"
    )]
    NetworkMismatch {
        kind: PaymentMethodKind,
        expected: Network,
        found: Network,
    },
    #[error("Invalid lightning invoice: {0}")]
    InvalidInvoice(#[from] InvoiceError),
    #[error("Invalid lightning offer: {0}")]
    InvalidOffer(#[from] OfferError),
    #[error("Invalid silent payment address: {0}")]
    InvalidSilentPayment(#[from] SilentPaymentError),
    #[error("Invalid ark address: {0}")]
    InvalidArkAddress(#[from] ArkError),
    #[error(transparent)]
    ForbiddenPopScheme(#[from] PopError),
    /// `name` is "label", "message", "amount", or "pop/req-pop".
    #[error("Multiple {0} parameters not allowed")]
    DuplicateParameter(&'static str),
    #[error("Unknown required parameter: {0}")]
    UnknownRequiredParameter(String),
    #[error("Invalid amount format")]
    InvalidAmountFormat,
    #[error("No valid payment methods found")]
    NoValidPaymentMethod,
    #[error("req-pop specified but no valid payment method available")]
    PopRequiredButUnsatisfied,
}

// Errors go over the wire as their human-readable message.
impl Serialize for ParseError {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Returned by [`encode`](crate::encode) when a request can't be turned into a
/// usable URI.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("Invalid amount format: amount must be non-negative")]
    InvalidAmount,
    /// The built URI failed to re-parse; holds every message joined by "; ".
    #[error("{0}")]
    Invalid(String),
    #[error("No valid payment methods")]
    NoValidPaymentMethods,
}

impl EncodeError {
    pub(crate) fn from_errors(errors: &[ParseError]) -> Self {
        if errors.is_empty() {
            return Self::NoValidPaymentMethods;
        }
        Self::Invalid(JoinErrors(errors).to_string())
    }
}

/// Displays a list of errors separated by "; ".
struct JoinErrors<'a>(&'a [ParseError]);

impl fmt::Display for JoinErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for err in self.0 {
            write!(f, "{sep}{err}")?;
            sep = "; ";
        }
        Ok(())
    }
}
