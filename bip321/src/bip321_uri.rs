//! BIP321 URI parsing.
//!
//! + [BIP21 - URI Scheme](https://github.com/bitcoin/bips/blob/master/bip-0021.mediawiki)
//! + [BIP321 - URI Scheme](https://github.com/bitcoin/bips/blob/master/bip-0321.mediawiki)

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashSet},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    address, ark,
    error::ParseError,
    lightning,
    network::Network,
    payment_method::{PaymentMethod, PaymentMethodKind},
    pop, silent_payment,
    uri::{Uri, UriParam},
};

/// Caller-supplied parse settings.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// If set, every payment method that is bound to a network must be usable
    /// on this network.
    pub expected_network: Option<Network>,
}

impl ParseOptions {
    pub fn expecting(network: Network) -> Self {
        Self {
            expected_network: Some(network),
        }
    }
}

/// Everything we learned from a single `bitcoin:` URI.
///
/// Parsing never stops at the first problem. `errors` lists every problem in
/// the order it was found, while `is_valid` is cleared by the problems that
/// make the URI unusable as a whole. A bad `lightning` param, for example, is
/// reported in `errors` and marks its own [`PaymentMethod`] invalid, but the
/// URI stays valid if some other method works.
///
/// ```not_rust
/// bitcoin:175tWpb8K1S7NmH4Zx6rewF9WQrcZv245W?amount=50&label=Luke-Jr
///
/// bitcoin:?lno=lno1qqqq02k20d&sp=sp1qq...
///
/// bitcoin:bc1qfj...?lightning=lnbc1...&req-pop=mywallet%3A
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ParseResult {
    /// The bare address in the URI body, exactly as written.
    pub address: Option<String>,
    /// The network of `address`, if it's valid.
    pub network: Option<Network>,
    /// Amount in BTC.
    pub amount: Option<Decimal>,
    /// The recipient/payee name.
    pub label: Option<String>,
    /// The payment description.
    pub message: Option<String>,
    /// The proof-of-payment callback, still percent-encoded.
    pub pop: Option<String>,
    /// `true` if the callback came from `req-pop`.
    pub pop_required: bool,
    pub payment_methods: Vec<PaymentMethod>,
    /// Unrecognized `req-*` keys, in their original case.
    pub required_params: Vec<String>,
    /// Unrecognized optional params: lower-cased key -> values.
    pub optional_params: BTreeMap<String, Vec<String>>,
    pub is_valid: bool,
    pub errors: Vec<ParseError>,
}

/// Params that may appear at most once, by the name used in the duplicate
/// error. `pop` and `req-pop` share a slot.
fn singleton_name(key: &str) -> Option<&'static str> {
    match key {
        "label" => Some("label"),
        "message" => Some("message"),
        "amount" => Some("amount"),
        "pop" | "req-pop" => Some("pop/req-pop"),
        _ => None,
    }
}

/// Network-scoped onchain address params and the network each one requires.
fn address_param_network(key: &str) -> Option<Network> {
    match key {
        "bc" => Some(Network::Mainnet),
        "tb" => Some(Network::Testnet),
        "bcrt" => Some(Network::Regtest),
        "tbs" => Some(Network::Signet),
        _ => None,
    }
}

impl ParseResult {
    const URI_SCHEME: &'static str = "bitcoin";

    pub fn matches_scheme(scheme: &str) -> bool {
        scheme.eq_ignore_ascii_case(Self::URI_SCHEME)
    }

    /// Parse a URI with the default [`ParseOptions`].
    pub fn parse(s: &str) -> Self {
        Self::parse_with(s, &ParseOptions::default())
    }

    pub fn parse_with(s: &str, options: &ParseOptions) -> Self {
        let mut out = Self::empty();

        let s = s.trim();
        if s.is_empty() {
            out.fail(ParseError::EmptyInput);
            return out;
        }
        let uri = match Uri::parse(s) {
            Some(uri) if Self::matches_scheme(uri.scheme) => uri,
            _ => {
                out.fail(ParseError::MalformedScheme);
                return out;
            }
        };

        out.parse_body(&uri.body);

        let mut seen = HashSet::new();
        for param in &uri.params {
            out.parse_param(param, &mut seen);
        }

        out.reconcile(options);
        out
    }

    /// Whether any payment method is usable.
    pub fn any_usable(&self) -> bool {
        self.payment_methods.iter().any(|method| method.is_valid)
    }

    pub fn valid_payment_methods(
        &self,
    ) -> impl Iterator<Item = &PaymentMethod> + '_ {
        self.payment_methods.iter().filter(|method| method.is_valid)
    }

    pub fn payment_methods_of(
        &self,
        kind: PaymentMethodKind,
    ) -> impl Iterator<Item = &PaymentMethod> + '_ {
        self.payment_methods
            .iter()
            .filter(move |method| method.kind == kind)
    }

    fn empty() -> Self {
        Self {
            address: None,
            network: None,
            amount: None,
            label: None,
            message: None,
            pop: None,
            pop_required: false,
            payment_methods: Vec::new(),
            required_params: Vec::new(),
            optional_params: BTreeMap::new(),
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Record an error that makes the whole URI invalid.
    fn fail(&mut self, error: ParseError) {
        debug!(%error, "Invalid bitcoin URI");
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Record an error that leaves the URI valid.
    fn warn(&mut self, error: ParseError) {
        debug!(%error, "Problem in bitcoin URI");
        self.errors.push(error);
    }

    // "bitcoin:{address}"
    fn parse_body(&mut self, body: &str) {
        if body.is_empty() {
            return;
        }

        let kind = PaymentMethodKind::Onchain;
        let value = body.to_owned();
        self.address = Some(value.clone());

        match address::classify(body) {
            Ok(network) => {
                self.network = Some(network);
                self.payment_methods
                    .push(PaymentMethod::valid(kind, value, Some(network)));
            }
            Err(err) => {
                let error = ParseError::from(err);
                self.payment_methods.push(PaymentMethod::invalid(
                    kind,
                    value,
                    None,
                    error.clone(),
                ));
                self.fail(error);
            }
        }
    }

    fn parse_param(
        &mut self,
        param: &UriParam<'_>,
        seen: &mut HashSet<&'static str>,
    ) {
        let key = param.key_parsed();
        let normalized = key.normalized();
        let value = &param.value;

        if let Some(name) = singleton_name(&normalized) {
            if !seen.insert(name) {
                self.fail(ParseError::DuplicateParameter(name));
                return;
            }
        }

        match normalized.as_str() {
            "label" => self.label = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "amount" => match parse_amount(value) {
                Some(amount) => self.amount = Some(amount),
                None => self.fail(ParseError::InvalidAmountFormat),
            },
            "pop" | "req-pop" => self.parse_pop(param, key.is_req),
            "lightning" => self.push_method(
                PaymentMethodKind::Lightning,
                value,
                lightning::classify_invoice(value).map(Some),
            ),
            "lno" => self.push_method(
                PaymentMethodKind::Offer,
                value,
                lightning::classify_offer(value).map(|()| None),
            ),
            "sp" => self.push_method(
                PaymentMethodKind::SilentPayment,
                value,
                silent_payment::classify(value).map(Some),
            ),
            "ark" => self.push_method(
                PaymentMethodKind::Ark,
                value,
                ark::classify(value).map(Some),
            ),
            other =>
                if let Some(expected) = address_param_network(other) {
                    self.parse_address_param(value, expected);
                } else if key.is_req {
                    self.required_params.push(key.raw.to_owned());
                    self.fail(ParseError::UnknownRequiredParameter(
                        key.raw.to_owned(),
                    ));
                } else {
                    self.optional_params
                        .entry(normalized.clone())
                        .or_default()
                        .push(value.to_string());
                },
        }
    }

    // "pop=..." or "req-pop=..."
    fn parse_pop(&mut self, param: &UriParam<'_>, required: bool) {
        let raw = param.encoded_value.to_string();
        let result = pop::validate_pop(&raw);
        self.pop = Some(raw);
        self.pop_required = required;

        if let Err(err) = result {
            if required {
                self.fail(err.into());
            } else {
                self.warn(err.into());
            }
        }
    }

    /// Record a `lightning`/`lno`/`sp`/`ark` method. A bad value only
    /// invalidates its own method.
    fn push_method<E: Into<ParseError>>(
        &mut self,
        kind: PaymentMethodKind,
        value: &Cow<'_, str>,
        result: Result<Option<Network>, E>,
    ) {
        let value = value.to_string();
        match result {
            Ok(network) => self
                .payment_methods
                .push(PaymentMethod::valid(kind, value, network)),
            Err(err) => {
                let error = err.into();
                self.payment_methods.push(PaymentMethod::invalid(
                    kind,
                    value,
                    None,
                    error.clone(),
                ));
                self.warn(error);
            }
        }
    }

    // "bc=...", "tb=...", "bcrt=...", "tbs=..."
    fn parse_address_param(&mut self, value: &str, expected: Network) {
        let kind = PaymentMethodKind::Onchain;
        let (network, error) = match address::classify(value) {
            Ok(found) if Network::onchain_compatible(expected, found) => {
                let method =
                    PaymentMethod::valid(kind, value.to_owned(), Some(found));
                self.payment_methods.push(method);
                return;
            }
            Ok(found) => (
                Some(found),
                ParseError::AddressNetworkMismatch { expected, found },
            ),
            Err(err) => (None, ParseError::from(err)),
        };

        self.payment_methods.push(PaymentMethod::invalid(
            kind,
            value.to_owned(),
            network,
            error.clone(),
        ));
        self.fail(error);
    }

    // Checks that need the whole URI.
    fn reconcile(&mut self, options: &ParseOptions) {
        if let Some(expected) = options.expected_network {
            let mismatches = self
                .payment_methods
                .iter_mut()
                .filter_map(|method| {
                    let found = method.network?;
                    if method.supports_network(expected) {
                        return None;
                    }
                    let error = ParseError::NetworkMismatch {
                        kind: method.kind,
                        expected,
                        found,
                    };
                    method.invalidate(error.clone());
                    Some(error)
                })
                .collect::<Vec<_>>();
            for error in mismatches {
                self.fail(error);
            }
        }

        if !self.any_usable() {
            self.fail(ParseError::NoValidPaymentMethod);
        }

        if self.pop_required && self.pop.is_some() && !self.any_usable() {
            self.warn(ParseError::PopRequiredButUnsatisfied);
        }
    }
}

/// Parse a BTC amount, e.g. "0.0024". Only plain decimal notation is allowed:
/// no sign, no exponent, no digit grouping.
fn parse_amount(s: &str) -> Option<Decimal> {
    let mut digits = 0;
    let mut dots = 0;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }

    let amount = Decimal::from_str(s).ok()?;
    (!amount.is_sign_negative()).then_some(amount)
}

#[cfg(test)]
mod test {
    use proptest::{
        prop_assert, prop_assert_eq, proptest, sample::select,
        strategy::Strategy,
    };
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        address::test::*,
        lightning::test::{
            MAINNET_INVOICE, MINIMAL_OFFER, OFFER, REGTEST_INVOICE,
            SIGNET_INVOICE,
        },
    };

    #[track_caller]
    fn parse_valid(s: &str) -> ParseResult {
        let result = ParseResult::parse(s);
        assert!(result.is_valid, "{s}: {:?}", result.errors);
        result
    }

    #[track_caller]
    fn parse_invalid(s: &str) -> ParseResult {
        let result = ParseResult::parse(s);
        assert!(!result.is_valid, "{s} should be invalid");
        result
    }

    #[track_caller]
    fn assert_has_error(result: &ParseResult, needle: &str) {
        assert!(
            result.errors.iter().any(|e| e.to_string().contains(needle)),
            "no error containing {needle:?} in {:?}",
            result.errors,
        );
    }

    #[test]
    fn test_bare_address() {
        logger::init_for_testing();

        let result = parse_valid(&format!("bitcoin:{MAINNET_P2PKH}"));
        assert_eq!(result.address.as_deref(), Some(MAINNET_P2PKH));
        assert_eq!(result.network, Some(Network::Mainnet));
        assert_eq!(result.payment_methods.len(), 1);
        let method = &result.payment_methods[0];
        assert!(method.is_onchain() && method.is_valid);
        assert_eq!(method.network, Some(Network::Mainnet));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_amount_with_comma() {
        let result = parse_invalid(&format!(
            "bitcoin:{MAINNET_P2PKH}?amount=50,000.00"
        ));
        assert_has_error(&result, "Invalid amount format");
        assert_eq!(result.amount, None);
    }

    #[test]
    fn test_address_param_wrong_network() {
        let result = parse_invalid(&format!("bitcoin:?bc={TESTNET_P2WPKH}"));
        assert_has_error(&result, "network mismatch");
        assert_eq!(result.payment_methods.len(), 1);
        assert!(!result.payment_methods[0].is_valid);
    }

    #[test]
    fn test_minimal_offer() {
        let result = parse_valid(&format!("bitcoin:?lno={MINIMAL_OFFER}"));
        assert_eq!(result.payment_methods.len(), 1);
        let method = &result.payment_methods[0];
        assert!(method.is_offer() && method.is_valid);
        assert_eq!(method.network, None);
    }

    #[test]
    fn test_no_payment_method() {
        let result = parse_invalid("bitcoin:?label=test");
        assert_has_error(&result, "No valid payment methods found");
        assert_eq!(result.label.as_deref(), Some("test"));
    }

    #[test]
    fn test_malformed_input() {
        let result = parse_invalid("");
        assert_eq!(result.errors, [ParseError::EmptyInput]);
        let result = parse_invalid("   \n");
        assert_eq!(result.errors, [ParseError::EmptyInput]);

        for s in ["litecoin:LKcSE", MAINNET_P2PKH, "bitcoin", "http://x"] {
            let result = parse_invalid(s);
            assert_eq!(result.errors, [ParseError::MalformedScheme], "{s}");
        }
    }

    #[test]
    fn test_long_message() {
        let message = "a".repeat(64 * 1024);
        let result =
            parse_valid(&format!("bitcoin:{MAINNET_P2PKH}?message={message}"));
        assert_eq!(result.address.as_deref(), Some(MAINNET_P2PKH));
        assert_eq!(result.message.as_deref(), Some(message.as_str()));
        assert_eq!(result.payment_methods.len(), 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_full_uri() {
        let uri = format!(
            "bitcoin:{MAINNET_P2WPKH}?amount=20.3&label=Luke-Jr\
             &message=Donation%20for%20project%20xyz\
             &lightning={MAINNET_INVOICE}&lno={OFFER}\
             &bc={MAINNET_P2TR}&foo=bar&Foo=baz&pop=mywallet%3Adone"
        );
        let result = parse_valid(&uri);
        assert_eq!(result.amount, Some(dec!(20.3)));
        assert_eq!(result.label.as_deref(), Some("Luke-Jr"));
        assert_eq!(
            result.message.as_deref(),
            Some("Donation for project xyz")
        );
        assert_eq!(result.pop.as_deref(), Some("mywallet%3Adone"));
        assert!(!result.pop_required);

        let kinds = result
            .payment_methods
            .iter()
            .map(|method| method.kind)
            .collect::<Vec<_>>();
        use PaymentMethodKind::*;
        assert_eq!(kinds, [Onchain, Lightning, Offer, Onchain]);
        assert_eq!(result.valid_payment_methods().count(), 4);
        assert_eq!(result.payment_methods_of(Onchain).count(), 2);

        assert_eq!(
            result.optional_params.get("foo"),
            Some(&vec!["bar".to_owned(), "baz".to_owned()]),
        );
        assert!(result.required_params.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_duplicates_keep_first() {
        for key in ["label", "message", "amount"] {
            let uri = format!(
                "bitcoin:{MAINNET_P2PKH}?{key}=1&{}=2",
                key.to_ascii_uppercase()
            );
            let result = parse_invalid(&uri);
            let expected = format!("Multiple {key} parameters not allowed");
            assert_has_error(&result, &expected);
        }

        let result =
            parse_invalid(&format!("bitcoin:{MAINNET_P2PKH}?label=a&label=b"));
        assert_eq!(result.label.as_deref(), Some("a"));
        let result =
            parse_invalid(&format!("bitcoin:{MAINNET_P2PKH}?amount=1&amount=2"));
        assert_eq!(result.amount, Some(dec!(1)));

        let result = parse_invalid(&format!(
            "bitcoin:{MAINNET_P2PKH}?pop=a%3A&req-pop=b%3A"
        ));
        assert_has_error(&result, "Multiple pop/req-pop parameters not allowed");
        assert_eq!(result.pop.as_deref(), Some("a%3A"));
        assert!(!result.pop_required);
    }

    #[test]
    fn test_pop() {
        let result =
            parse_valid(&format!("bitcoin:{MAINNET_P2PKH}?req-pop=app%3Ax%3Dy"));
        assert_eq!(result.pop.as_deref(), Some("app%3Ax%3Dy"));
        assert!(result.pop_required);

        // Forbidden scheme in optional pop: reported, URI still valid.
        let result = parse_valid(&format!(
            "bitcoin:{MAINNET_P2PKH}?pop=https%3A%2F%2Fevil.com"
        ));
        assert_has_error(&result, "Forbidden pop scheme: https");

        // ...but blocking in req-pop.
        let result = parse_invalid(&format!(
            "bitcoin:{MAINNET_P2PKH}?REQ-POP=javascript%3Aalert(1)"
        ));
        assert_has_error(&result, "Forbidden pop scheme: javascript");

        // req-pop without anything to pay.
        let result = parse_invalid("bitcoin:?req-pop=app%3A");
        assert_has_error(&result, "No valid payment methods found");
        assert_has_error(&result, "req-pop specified");
    }

    #[test]
    fn test_unknown_required_param() {
        let result = parse_invalid(&format!(
            "bitcoin:{MAINNET_P2PKH}?req-Foo=1&req-bar&baz=2"
        ));
        assert_eq!(result.required_params, ["req-Foo", "req-bar"]);
        assert_has_error(&result, "Unknown required parameter: req-Foo");
        assert_eq!(
            result.optional_params.get("baz"),
            Some(&vec!["2".to_owned()])
        );
    }

    #[test]
    fn test_bad_lightning_is_not_blocking() {
        let result = parse_valid(&format!(
            "bitcoin:{MAINNET_P2PKH}?lightning=lnbc1bogus&lno=xyz\
             &sp=sp1qsilentpayment&ark=ark1nope"
        ));
        assert_eq!(result.payment_methods.len(), 5);
        assert_eq!(result.valid_payment_methods().count(), 1);
        assert_eq!(result.errors.len(), 4);
        assert!(
            result.payment_methods[1..]
                .iter()
                .all(|method| !method.is_valid && method.error.is_some())
        );

        // With nothing else to pay, the URI is unusable.
        let result = parse_invalid("bitcoin:?lightning=lnbc1bogus");
        assert_has_error(&result, "Invalid lightning invoice");
        assert_has_error(&result, "No valid payment methods found");
    }

    #[test]
    fn test_invalid_bare_address() {
        let result = parse_invalid("bitcoin:1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNb");
        assert_eq!(result.network, None);
        assert_eq!(result.payment_methods.len(), 1);
        assert!(!result.payment_methods[0].is_valid);
        assert_has_error(&result, "Invalid bitcoin address");
    }

    #[test]
    fn test_address_params() {
        let result = parse_valid(&format!(
            "bitcoin:?tb={TESTNET_P2WPKH}&tbs={TESTNET_P2TR}\
             &bcrt={REGTEST_P2WPKH}&bc={MAINNET_P2SH}"
        ));
        assert_eq!(result.payment_methods.len(), 4);
        assert!(result.errors.is_empty());

        // Undecodable is blocking too.
        let result = parse_invalid(&format!(
            "bitcoin:{MAINNET_P2PKH}?bc=bc1qqqqqqq"
        ));
        assert_has_error(&result, "Invalid segwit address");

        let result =
            parse_invalid(&format!("bitcoin:?bcrt={TESTNET_P2WPKH}"));
        assert_has_error(&result, "expected regtest, found testnet");
    }

    #[test]
    fn test_address_params_wrong_network() {
        let cases = [
            ("bc", TESTNET_P2WPKH),
            ("tb", MAINNET_P2WPKH),
            ("bcrt", TESTNET_P2WPKH),
            ("tbs", MAINNET_P2TR),
        ];
        for (key, address) in cases {
            let result = parse_invalid(&format!("bitcoin:?{key}={address}"));
            assert_has_error(&result, "network mismatch");
            assert_eq!(result.payment_methods.len(), 1, "{key}");
            let method = &result.payment_methods[0];
            assert!(method.is_onchain() && !method.is_valid, "{key}");
            assert!(method.error.is_some(), "{key}");
        }
    }

    #[test]
    fn test_expected_network() {
        use crate::silent_payment::test::testnet_address;

        let uri = format!(
            "bitcoin:{TESTNET_P2WPKH}?sp={}&lno={OFFER}",
            testnet_address()
        );
        for network in [Network::Testnet, Network::Signet] {
            let result =
                ParseResult::parse_with(&uri, &ParseOptions::expecting(network));
            assert!(result.is_valid, "{network}: {:?}", result.errors);
        }

        // Regtest: the `tsp` address is fine, the `tb1` address isn't.
        let result = ParseResult::parse_with(
            &uri,
            &ParseOptions::expecting(Network::Regtest),
        );
        assert!(!result.is_valid);
        assert_eq!(result.valid_payment_methods().count(), 2);
        assert!(!result.payment_methods[0].is_valid);
        assert_has_error(&result, "Network mismatch for onchain");

        // Lightning needs an exact match.
        let uri = format!("bitcoin:?lightning={SIGNET_INVOICE}");
        let result = ParseResult::parse_with(
            &uri,
            &ParseOptions::expecting(Network::Testnet),
        );
        assert!(!result.is_valid);
        assert_has_error(&result, "Network mismatch for lightning");
        assert_has_error(&result, "No valid payment methods found");

        let uri = format!("bitcoin:?lightning={REGTEST_INVOICE}");
        let result = ParseResult::parse_with(
            &uri,
            &ParseOptions::expecting(Network::Regtest),
        );
        assert!(result.is_valid);

        // Offers carry no network.
        let uri = format!("bitcoin:?lno={MINIMAL_OFFER}");
        let result = ParseResult::parse_with(
            &uri,
            &ParseOptions::expecting(Network::Mainnet),
        );
        assert!(result.is_valid);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0"), Some(dec!(0)));
        assert_eq!(parse_amount("20.3"), Some(dec!(20.3)));
        assert_eq!(parse_amount(".5"), Some(dec!(0.5)));
        assert_eq!(parse_amount("1."), Some(dec!(1)));
        for bad in ["", ".", "-1", "+1", "1e3", "1_000", "1,0", "1.2.3", "NaN"]
        {
            assert_eq!(parse_amount(bad), None, "{bad}");
        }
    }

    #[test]
    fn test_parse_result_serialize() {
        let result = parse_valid(&format!(
            "bitcoin:{MAINNET_P2PKH}?amount=0.001&lightning=lnbc1bogus"
        ));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["network"], "mainnet");
        assert_eq!(json["amount"], "0.001");
        assert_eq!(json["payment_methods"][0]["kind"], "onchain");
        assert_eq!(json["payment_methods"][1]["kind"], "lightning");
        assert_eq!(json["is_valid"], true);
        assert!(
            json["errors"][0]
                .as_str()
                .unwrap()
                .starts_with("Invalid lightning invoice")
        );
    }

    #[test]
    fn test_prop_parse_never_panics() {
        proptest!(|(s: String)| {
            let result = ParseResult::parse(&s);
            prop_assert!(result.is_valid || !result.errors.is_empty());
        });
        proptest!(|(query: String)| {
            let result =
                ParseResult::parse(&format!("bitcoin:{MAINNET_P2PKH}?{query}"));
            prop_assert!(!result.payment_methods.is_empty());
        });
    }

    /// Randomly upper-case some ASCII characters.
    fn random_case(s: &str) -> impl Strategy<Value = String> + use<> {
        let chars = s.chars().collect::<Vec<_>>();
        proptest::collection::vec(proptest::bool::ANY, chars.len()).prop_map(
            move |flips| {
                chars
                    .iter()
                    .zip(flips)
                    .map(|(c, flip)| if flip { c.to_ascii_uppercase() } else { *c })
                    .collect()
            },
        )
    }

    #[test]
    fn test_prop_case_insensitive_keys() {
        const KEYS: [&str; 4] = ["amount", "label", "message", "lno"];
        proptest!(|(
            scheme in random_case("bitcoin"),
            key in select(KEYS.to_vec()).prop_flat_map(random_case),
        )| {
            let lower_key = key.to_ascii_lowercase();
            let value = match lower_key.as_str() {
                "lno" => MINIMAL_OFFER,
                _ => "1",
            };
            let uri = format!("{scheme}:{MAINNET_P2PKH}?{key}={value}");
            let result = ParseResult::parse(&uri);
            prop_assert!(result.is_valid);
            prop_assert!(result.optional_params.is_empty());

            let lower_uri = format!("bitcoin:{MAINNET_P2PKH}?{lower_key}={value}");
            let lower = ParseResult::parse(&lower_uri);
            prop_assert_eq!(lower.amount, result.amount);
            prop_assert_eq!(lower.label, result.label);
            prop_assert_eq!(lower.payment_methods.len(), result.payment_methods.len());
        });
    }
}
