//! Onchain address classification: detect the encoding family and network of
//! a bare address string.

use bech32::{Bech32, Bech32m, Fe32, primitives::decode::UncheckedHrpstring};
use bitcoin::hashes::{Hash as _, sha256d};

use crate::network::Network;

/// Bech32 segwit HRP prefixes (including the `1` separator) and the network
/// each one implies. Signet shares `tb` with testnet.
const SEGWIT_PREFIXES: [(&str, Network); 3] = [
    ("bc1", Network::Mainnet),
    ("tb1", Network::Testnet),
    ("bcrt1", Network::Regtest),
];

/// Base58check version bytes for P2PKH and P2SH addresses. Regtest and signet
/// reuse the testnet version bytes.
const BASE58_VERSIONS: [(u8, Network); 4] = [
    (0x00, Network::Mainnet),
    (0x05, Network::Mainnet),
    (0x6f, Network::Testnet),
    (0xc4, Network::Testnet),
];

/// 1 version byte + 20 byte hash + 4 byte checksum.
const MIN_BASE58_LEN: usize = 25;
const CHECKSUM_LEN: usize = 4;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AddressError {
    #[error("Empty address")]
    Empty,
    /// Looked like a segwit address (matched a known HRP prefix) but didn't
    /// decode as bech32 or bech32m for that HRP.
    #[error("Invalid segwit address: undetected network")]
    InvalidSegwit,
    #[error("Invalid bitcoin address")]
    InvalidBitcoinAddress,
}

/// Classify a bare onchain address, returning the network it belongs to.
///
/// + Segwit addresses (`bc1`, `tb1`, `bcrt1`; any case) are decoded as bech32
///   (witness v0) and then bech32m (witness v1+).
/// + Anything else is treated as a base58check P2PKH / P2SH address.
pub fn classify(address: &str) -> Result<Network, AddressError> {
    if address.is_empty() {
        return Err(AddressError::Empty);
    }

    if let Some((hrp, network)) = matches_hrp_prefix(address) {
        return decode_segwit(address, hrp)
            .map(|()| network)
            .ok_or(AddressError::InvalidSegwit);
    }

    decode_base58check(address)
}

/// Returns the HRP and network of the first segwit prefix `s` starts with.
pub(crate) fn matches_hrp_prefix(s: &str) -> Option<(&'static str, Network)> {
    let bytes = s.as_bytes();
    SEGWIT_PREFIXES.iter().find_map(|&(prefix, network)| {
        let (head, _) = bytes.split_at_checked(prefix.len())?;
        if head.eq_ignore_ascii_case(prefix.as_bytes()) {
            let hrp = &prefix[..prefix.len() - 1];
            Some((hrp, network))
        } else {
            None
        }
    })
}

/// The two segwit decode attempts, evaluated in order.
#[derive(Copy, Clone, Debug)]
enum SegwitAttempt {
    /// bech32 checksum, witness version 0.
    V0Bech32,
    /// bech32m checksum, witness version 1 through 16 (taproot and up).
    V1PlusBech32m,
}

impl SegwitAttempt {
    const ORDER: [Self; 2] = [Self::V0Bech32, Self::V1PlusBech32m];

    fn try_decode(self, parsed: &UncheckedHrpstring<'_>) -> Option<()> {
        let checksum_ok = match self {
            Self::V0Bech32 => parsed.has_valid_checksum::<Bech32>(),
            Self::V1PlusBech32m => parsed.has_valid_checksum::<Bech32m>(),
        };
        if !checksum_ok {
            return None;
        }

        // The first data character is the witness version.
        let version_char = *parsed.data_part_ascii().first()?;
        let version = Fe32::from_char(char::from(version_char)).ok()?;
        let version_ok = match self {
            Self::V0Bech32 => version == Fe32::Q,
            Self::V1PlusBech32m => version != Fe32::Q && version.to_u8() <= 16,
        };
        version_ok.then_some(())
    }
}

/// Decode a segwit address, requiring its HRP to be exactly `expected_hrp`.
fn decode_segwit(address: &str, expected_hrp: &str) -> Option<()> {
    let parsed = UncheckedHrpstring::new(address).ok()?;
    if !parsed.hrp().as_str().eq_ignore_ascii_case(expected_hrp) {
        return None;
    }
    SegwitAttempt::ORDER
        .iter()
        .find_map(|attempt| attempt.try_decode(&parsed))
}

/// Decode a base58check address and map its version byte to a network.
fn decode_base58check(address: &str) -> Result<Network, AddressError> {
    let raw = bitcoin::base58::decode(address)
        .map_err(|_| AddressError::InvalidBitcoinAddress)?;
    if raw.len() < MIN_BASE58_LEN {
        return Err(AddressError::InvalidBitcoinAddress);
    }

    let (payload, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    let expected = sha256d::Hash::hash(payload);
    if checksum != &expected.as_byte_array()[..CHECKSUM_LEN] {
        return Err(AddressError::InvalidBitcoinAddress);
    }

    let version = payload[0];
    BASE58_VERSIONS
        .iter()
        .find(|(v, _)| *v == version)
        .map(|&(_, network)| network)
        .ok_or(AddressError::InvalidBitcoinAddress)
}
