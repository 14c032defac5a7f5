//! BIP352 silent payment addresses (`sp1...` / `tsp1...`).
//!
//! A v0 address is a bech32m string whose data part is a version word
//! followed by two compressed secp256k1 public keys: the scan key and the
//! spend key.

use bech32::Fe32;

use crate::{
    helpers::{self, Bech32mError},
    network::Network,
};

const HRPS: [(&str, Network); 2] =
    [("tsp", Network::Testnet), ("sp", Network::Mainnet)];

/// scan pubkey (33) + spend pubkey (33).
const PAYLOAD_LEN: usize = 66;
const SPEND_KEY_OFFSET: usize = 33;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SilentPaymentError {
    #[error("missing 'sp1' or 'tsp1' prefix")]
    MissingPrefix,
    #[error(transparent)]
    Bech32m(#[from] Bech32mError),
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("invalid length")]
    InvalidLength,
    #[error("invalid public key format")]
    InvalidPublicKeyFormat,
}

/// Validate a silent payment address and return its network.
///
/// `tsp` addresses may be used on testnet, signet, or regtest; we report them
/// all as [`Network::Testnet`].
pub fn classify(address: &str) -> Result<Network, SilentPaymentError> {
    let (hrp, network) = helpers::match_hrp_prefix(address, &HRPS)
        .ok_or(SilentPaymentError::MissingPrefix)?;

    let fes = helpers::decode_bech32m(address, hrp)?;

    let (version, program) =
        fes.split_first().ok_or(SilentPaymentError::InvalidLength)?;
    if *version != Fe32::Q {
        return Err(SilentPaymentError::UnsupportedVersion);
    }

    let payload = helpers::fes_to_bytes(program)
        .filter(|bytes| bytes.len() == PAYLOAD_LEN)
        .ok_or(SilentPaymentError::InvalidLength)?;

    let is_compressed_prefix = |b: u8| b == 0x02 || b == 0x03;
    if !is_compressed_prefix(payload[0])
        || !is_compressed_prefix(payload[SPEND_KEY_OFFSET])
    {
        return Err(SilentPaymentError::InvalidPublicKeyFormat);
    }

    Ok(network)
}
