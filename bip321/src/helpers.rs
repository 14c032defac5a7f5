use bech32::{Bech32m, Fe32, primitives::decode::CheckedHrpstring};

/// The longest data part (in 5-bit words, checksum excluded) we'll accept in
/// a bech32m payment code.
pub(crate) const MAX_BECH32M_WORDS: usize = 1023;

/// Why a bech32m payment code failed to decode.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Bech32mError {
    #[error("{0}")]
    Decode(String),
    #[error("unexpected human-readable part: expected '{expected}'")]
    HrpMismatch { expected: &'static str },
    #[error("data part is too long")]
    TooLong,
}

/// Returns the entry of `hrps` whose `<hrp>1` prefix `s` starts with,
/// case-insensitively.
pub(crate) fn match_hrp_prefix<T: Copy>(
    s: &str,
    hrps: &[(&'static str, T)],
) -> Option<(&'static str, T)> {
    let bytes = s.as_bytes();
    hrps.iter().copied().find(|(hrp, _)| {
        match bytes.split_at_checked(hrp.len() + 1) {
            Some((prefix, _)) =>
                prefix[..hrp.len()].eq_ignore_ascii_case(hrp.as_bytes())
                    && prefix[hrp.len()] == b'1',
            None => false,
        }
    })
}

/// Decode `s` as bech32m and require its HRP to be exactly `expected_hrp`.
/// Returns the data part as 5-bit words, checksum removed.
pub(crate) fn decode_bech32m(
    s: &str,
    expected_hrp: &'static str,
) -> Result<Vec<Fe32>, Bech32mError> {
    let checked = CheckedHrpstring::new::<Bech32m>(s)
        .map_err(|e| Bech32mError::Decode(e.to_string()))?;

    if !checked.hrp().as_str().eq_ignore_ascii_case(expected_hrp) {
        return Err(Bech32mError::HrpMismatch {
            expected: expected_hrp,
        });
    }

    let data = checked.data_part_ascii_no_checksum();
    if data.len() > MAX_BECH32M_WORDS {
        return Err(Bech32mError::TooLong);
    }

    data.iter()
        .map(|&c| {
            let c = char::from(c.to_ascii_lowercase());
            Fe32::from_char(c).map_err(|e| Bech32mError::Decode(e.to_string()))
        })
        .collect()
}

/// Regroup 5-bit words into bytes.
///
/// Returns `None` if the leftover padding is 5 bits or more, or isn't all
/// zeroes.
pub(crate) fn fes_to_bytes(fes: &[Fe32]) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(fes.len() * 5 / 8);

    for fe in fes {
        acc = ((acc << 5) | u32::from(fe.to_u8())) & 0xfff;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }

    let padding = acc & ((1 << bits) - 1);
    if bits >= 5 || padding != 0 {
        return None;
    }
    Some(out)
}
