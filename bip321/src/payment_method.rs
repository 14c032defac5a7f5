use std::fmt;

#[cfg(test)]
use proptest_derive::Arbitrary;
use serde::Serialize;
use strum::VariantArray;

use crate::{error::ParseError, network::Network};

/// The kinds of payment method a BIP321 URI can carry.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, VariantArray,
)]
#[cfg_attr(test, derive(Arbitrary))]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethodKind {
    /// A bitcoin address, from the URI body or a `bc`/`tb`/`bcrt`/`tbs` param.
    Onchain,
    /// A BOLT11 invoice (`lightning`).
    Lightning,
    /// A BOLT12 offer (`lno`).
    Offer,
    /// A BIP352 silent payment address (`sp`).
    SilentPayment,
    /// An ark address (`ark`).
    Ark,
}

impl PaymentMethodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Onchain => "onchain",
            Self::Lightning => "lightning",
            Self::Offer => "offer",
            Self::SilentPayment => "silent-payment",
            Self::Ark => "ark",
        }
    }
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One payment descriptor found in a URI, e.g. one `lightning=` param.
///
/// Repeated params produce one [`PaymentMethod`] each, in the order they
/// appeared.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PaymentMethod {
    pub kind: PaymentMethodKind,
    /// The value as it appeared in the URI (percent-decoded).
    pub value: String,
    /// The network this method is bound to, if it could be determined.
    pub network: Option<Network>,
    pub is_valid: bool,
    /// Why this method is unusable.
    pub error: Option<ParseError>,
}

impl PaymentMethod {
    pub(crate) fn valid(
        kind: PaymentMethodKind,
        value: String,
        network: Option<Network>,
    ) -> Self {
        Self {
            kind,
            value,
            network,
            is_valid: true,
            error: None,
        }
    }

    pub(crate) fn invalid(
        kind: PaymentMethodKind,
        value: String,
        network: Option<Network>,
        error: ParseError,
    ) -> Self {
        Self {
            kind,
            value,
            network,
            is_valid: false,
            error: Some(error),
        }
    }

    /// Mark this method unusable. The first error recorded is kept.
    pub(crate) fn invalidate(&mut self, error: ParseError) {
        self.is_valid = false;
        self.error.get_or_insert(error);
    }

    pub fn is_onchain(&self) -> bool {
        self.kind == PaymentMethodKind::Onchain
    }

    pub fn is_lightning(&self) -> bool {
        self.kind == PaymentMethodKind::Lightning
    }

    pub fn is_offer(&self) -> bool {
        self.kind == PaymentMethodKind::Offer
    }

    pub fn is_silent_payment(&self) -> bool {
        self.kind == PaymentMethodKind::SilentPayment
    }

    pub fn is_ark(&self) -> bool {
        self.kind == PaymentMethodKind::Ark
    }

    /// Whether this method can be used on the `expected` network.
    ///
    /// Methods without a network (offers, or methods that failed to decode)
    /// are never rejected here.
    pub fn supports_network(&self, expected: Network) -> bool {
        let found = match self.network {
            Some(found) => found,
            None => return true,
        };
        match self.kind {
            PaymentMethodKind::Onchain =>
                Network::onchain_compatible(expected, found),
            PaymentMethodKind::SilentPayment | PaymentMethodKind::Ark =>
                Network::test_hrp_compatible(expected, found),
            PaymentMethodKind::Lightning => expected == found,
            PaymentMethodKind::Offer => true,
        }
    }
}
