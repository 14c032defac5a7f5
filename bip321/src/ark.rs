//! Ark addresses (`ark1...` / `tark1...`). Only decodability is checked.

use crate::{
    helpers::{self, Bech32mError},
    network::Network,
};

const HRPS: [(&str, Network); 2] =
    [("tark", Network::Testnet), ("ark", Network::Mainnet)];

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ArkError {
    #[error("missing 'ark1' or 'tark1' prefix")]
    MissingPrefix,
    #[error(transparent)]
    Bech32m(#[from] Bech32mError),
}

/// Validate an ark address and return its network. `tark` addresses are
/// reported as [`Network::Testnet`].
pub fn classify(address: &str) -> Result<Network, ArkError> {
    let (hrp, network) = helpers::match_hrp_prefix(address, &HRPS)
        .ok_or(ArkError::MissingPrefix)?;
    helpers::decode_bech32m(address, hrp)?;
    Ok(network)
}
