use std::{fmt, str::FromStr};

use anyhow::anyhow;
#[cfg(test)]
use proptest_derive::Arbitrary;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::VariantArray;

/// The bitcoin network a payment method is bound to.
///
/// Not every payment format can tell every network apart. Bech32 onchain
/// addresses share the `tb` HRP between testnet and signet, and silent payment
/// / ark addresses only distinguish mainnet from "some test network", which we
/// report as [`Network::Testnet`].
///
/// [`Network::Unknown`] is only produced for decodable payment methods that
/// target a network we don't otherwise model (e.g. a simnet invoice).
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    VariantArray,
)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
    Signet,
    Unknown,
}

impl Network {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Regtest => "regtest",
            Self::Signet => "signet",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for the test networks: testnet, signet, and regtest.
    pub fn is_testnet_like(self) -> bool {
        matches!(self, Self::Testnet | Self::Signet | Self::Regtest)
    }

    /// Whether an onchain address detected as `found` can be used where
    /// `expected` is required.
    ///
    /// Testnet and signet share the `tb1` bech32 HRP and the base58 version
    /// bytes, so we can't tell them apart from the address alone.
    pub fn onchain_compatible(expected: Self, found: Self) -> bool {
        use Network::*;
        expected == found
            || matches!((expected, found), (Testnet, Signet) | (Signet, Testnet))
    }

    /// Whether a silent payment or ark address detected as `found` can be used
    /// where `expected` is required.
    ///
    /// These formats only have a mainnet and a "testnet" HRP, so a testnet
    /// address satisfies any test network. There is no regtest HRP, so a
    /// detected network is never regtest itself.
    pub fn test_hrp_compatible(expected: Self, found: Self) -> bool {
        expected == found
            || (found == Self::Testnet && expected.is_testnet_like())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            "signet" => Ok(Self::Signet),
            "unknown" => Ok(Self::Unknown),
            _ => Err(anyhow!("Invalid `Network`: '{s}'")),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<lightning_invoice::Currency> for Network {
    fn from(currency: lightning_invoice::Currency) -> Self {
        use lightning_invoice::Currency;
        match currency {
            Currency::Bitcoin => Self::Mainnet,
            Currency::BitcoinTestnet => Self::Testnet,
            Currency::Regtest => Self::Regtest,
            Currency::Signet => Self::Signet,
            Currency::Simnet => Self::Unknown,
        }
    }
}
