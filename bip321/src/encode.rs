//! Build a `bitcoin:` URI from a structured payment request.

use std::{borrow::Cow, collections::BTreeMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    bip321_uri::ParseResult,
    error::EncodeError,
    network::Network,
    payment_method::PaymentMethodKind,
    uri::{Uri, UriParam},
};

/// A proof-of-payment callback. `pop` and `req-pop` can't both be set.
///
/// The value is written into the URI as-is, so it should already be
/// percent-encoded.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pop {
    #[default]
    None,
    Pop(String),
    RequiredPop(String),
}

/// The value(s) of a caller-supplied extra param.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

/// Everything that can go into a `bitcoin:` URI.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeRequest {
    /// Written unencoded into the URI body.
    pub address: Option<String>,
    /// Amount in BTC. Must be non-negative.
    pub amount: Option<Decimal>,
    pub label: Option<String>,
    pub message: Option<String>,
    pub pop: Pop,
    /// BOLT11 invoices (`lightning`).
    pub lightning: Vec<String>,
    /// BOLT12 offers (`lno`).
    pub offers: Vec<String>,
    /// Silent payment addresses (`sp`).
    pub silent_payments: Vec<String>,
    /// Ark addresses (`ark`).
    pub ark: Vec<String>,
    pub bc: Vec<String>,
    pub tb: Vec<String>,
    pub bcrt: Vec<String>,
    pub tbs: Vec<String>,
    /// Extra params, written after everything else. Keys are written in
    /// sorted order, not insertion order; each key's values keep their order.
    pub optional_params: BTreeMap<String, ParamValue>,
}

/// A successfully encoded URI along with the result of parsing it back.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Encoded {
    pub uri: String,
    #[serde(flatten)]
    pub result: ParseResult,
}

/// Encode `request` as a `bitcoin:` URI.
///
/// The URI is parsed back before returning; a request that doesn't produce a
/// valid URI with at least one usable payment method is an error.
pub fn encode(request: &EncodeRequest) -> Result<Encoded, EncodeError> {
    if request.amount.is_some_and(|amount| amount.is_sign_negative()) {
        warn!("Refusing to encode a negative amount");
        return Err(EncodeError::InvalidAmount);
    }

    let uri = request.to_uri().to_string();
    let result = ParseResult::parse(&uri);
    if !result.is_valid || !result.any_usable() {
        let err = EncodeError::from_errors(&result.errors);
        warn!(%uri, %err, "Encoded URI failed validation");
        return Err(err);
    }

    Ok(Encoded { uri, result })
}

impl EncodeRequest {
    fn to_uri(&self) -> Uri<'_> {
        let mut params = Vec::new();

        // Amount: normalized, so "1.50" is written as "1.5".
        if let Some(amount) = self.amount {
            let amount = amount.normalize().to_string();
            params.push(UriParam::new("amount", &amount));
        }
        if let Some(label) = &self.label {
            params.push(UriParam::new("label", label));
        }
        if let Some(message) = &self.message {
            params.push(UriParam::new("message", message));
        }
        match &self.pop {
            Pop::None => (),
            Pop::Pop(pop) => params.push(UriParam::pre_encoded("pop", pop)),
            Pop::RequiredPop(pop) =>
                params.push(UriParam::pre_encoded("req-pop", pop)),
        }

        let repeated = [
            ("lightning", &self.lightning),
            ("lno", &self.offers),
            ("sp", &self.silent_payments),
            ("ark", &self.ark),
            ("bc", &self.bc),
            ("tb", &self.tb),
            ("bcrt", &self.bcrt),
            ("tbs", &self.tbs),
        ];
        for (key, values) in repeated {
            params.extend(values.iter().map(|value| UriParam::new(key, value)));
        }

        for (key, value) in &self.optional_params {
            params.extend(
                value
                    .values()
                    .iter()
                    .map(|v| UriParam::new(key.as_str(), v)),
            );
        }

        Uri {
            scheme: "bitcoin",
            body: Cow::Borrowed(self.address.as_deref().unwrap_or("")),
            params,
        }
    }

    fn address_slot(&mut self, network: Network) -> Option<&mut Vec<String>> {
        match network {
            Network::Mainnet => Some(&mut self.bc),
            Network::Testnet => Some(&mut self.tb),
            Network::Regtest => Some(&mut self.bcrt),
            Network::Signet => Some(&mut self.tbs),
            Network::Unknown => None,
        }
    }
}

/// Rebuild a request from a parse result.
///
/// For a valid result, encoding the request gives back an equivalent URI.
/// Onchain params land in the slot matching their detected network, so a
/// `tbs` param comes back as `tb`. Unknown `req-*` params are dropped since
/// their values aren't kept.
impl From<&ParseResult> for EncodeRequest {
    fn from(result: &ParseResult) -> Self {
        let mut out = Self {
            address: result.address.clone(),
            amount: result.amount,
            label: result.label.clone(),
            message: result.message.clone(),
            pop: match (&result.pop, result.pop_required) {
                (None, _) => Pop::None,
                (Some(pop), false) => Pop::Pop(pop.clone()),
                (Some(pop), true) => Pop::RequiredPop(pop.clone()),
            },
            optional_params: result
                .optional_params
                .iter()
                .map(|(key, values)| {
                    let value = match values.as_slice() {
                        [one] => ParamValue::One(one.clone()),
                        _ => ParamValue::Many(values.clone()),
                    };
                    (key.clone(), value)
                })
                .collect(),
            ..Self::default()
        };

        // The body address, if any, is always the first method.
        let skip = usize::from(result.address.is_some());
        for method in result.payment_methods.iter().skip(skip) {
            let value = method.value.clone();
            let slot = match method.kind {
                PaymentMethodKind::Lightning => Some(&mut out.lightning),
                PaymentMethodKind::Offer => Some(&mut out.offers),
                PaymentMethodKind::SilentPayment =>
                    Some(&mut out.silent_payments),
                PaymentMethodKind::Ark => Some(&mut out.ark),
                PaymentMethodKind::Onchain =>
                    method.network.and_then(|n| out.address_slot(n)),
            };
            if let Some(slot) = slot {
                slot.push(value);
            }
        }

        out
    }
}
