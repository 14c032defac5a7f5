use std::{borrow::Cow, fmt};

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC};

/// These are the ASCII characters that we will percent-encode inside a URI
/// query string key or value. We're somewhat conservative here and require
/// all non-alphanumeric characters to be percent-encoded (with the exception
/// of the "unreserved" characters designated in [RFC 3986]).
///
/// Space is always written as `%20`, never `+`.
///
/// [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.3
const PERCENT_ENCODE_ASCII_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Characters we escape in a value that is *already* percent-encoded (the
/// `pop` callback). `%` is left alone so existing escapes pass through
/// unchanged; we only touch what would otherwise break the URI grammar.
const PRE_ENCODED_ASCII_SET: AsciiSet = CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// A raw, tokenized URI.
///
/// ex: `bitcoin:bc1qfj...?label=Luke%20Jr&amount=0.1`
/// -> Uri {
///     scheme: "bitcoin",
///     body: "bc1qfj...",
///     params: [("label", "Luke Jr"), ("amount", "0.1")],
/// }
#[derive(Debug)]
pub(crate) struct Uri<'a> {
    pub scheme: &'a str,
    /// The bare path address. Never percent-decoded.
    pub body: Cow<'a, str>,
    /// Query params, in the order they appeared.
    pub params: Vec<UriParam<'a>>,
}

impl<'a> Uri<'a> {
    // syntax: `<scheme>:<body>?<key1>=<value1>&<key2>=<value2>&...`
    pub fn parse(s: &'a str) -> Option<Self> {
        // parse scheme
        // ex: "bitcoin:bc1qfj..." -> `scheme = "bitcoin"`
        let (scheme, rest) = s.split_once(':')?;

        // heuristic: limit scheme to 12 characters. If an input exceeds this,
        // then it's probably not a URI.
        if scheme.len() > 12 {
            return None;
        }

        // ex: "bitcoin:bc1qfj...?message=hello" -> `body = "bc1qfj..."`
        let (body, query) = rest.split_once('?').unwrap_or((rest, ""));

        // ex: "bitcoin:bc1qfj...?message=hello%20world&amount=0.1"
        //     -> `params = [("message", "hello world"), ("amount", "0.1")]`
        let params = query
            .split('&')
            .filter_map(UriParam::parse)
            .collect::<Vec<_>>();

        Some(Self {
            scheme,
            body: Cow::Borrowed(body),
            params,
        })
    }
}

// "{scheme}:{body}?{key1}={value1}&{key2}={value2}&..."
impl fmt::Display for Uri<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = self.scheme;
        let body = &self.body;

        write!(f, "{scheme}:{body}")?;

        let mut sep: char = '?';
        for param in &self.params {
            write!(f, "{sep}{param}")?;
            sep = '&';
        }
        Ok(())
    }
}

/// A single `<key>=<value>` URI parameter.
#[derive(Debug)]
pub(crate) struct UriParam<'a> {
    /// The percent-decoded key, in its original case.
    pub key: Cow<'a, str>,
    /// The percent-decoded value.
    pub value: Cow<'a, str>,
    /// The value exactly as it appears in the URI, still percent-encoded.
    pub encoded_value: Cow<'a, str>,
}

impl<'a> UriParam<'a> {
    /// Parse a single `key=value` pair. A pair without a `=` has an empty
    /// value. Returns `None` for empty pairs or pairs with an empty key.
    pub fn parse(s: &'a str) -> Option<Self> {
        let (key, encoded_value) = s.split_once('=').unwrap_or((s, ""));
        if key.is_empty() {
            return None;
        }
        Some(Self {
            key: percent_decode(key),
            value: percent_decode(encoded_value),
            encoded_value: Cow::Borrowed(encoded_value),
        })
    }

    /// Build a param from an unencoded value, for writing into a URI.
    pub fn new(key: impl Into<Cow<'a, str>>, value: &str) -> Self {
        let encoded_value =
            percent_encoding::utf8_percent_encode(value, &PERCENT_ENCODE_ASCII_SET)
                .to_string();
        Self {
            key: key.into(),
            value: Cow::Owned(value.to_owned()),
            encoded_value: Cow::Owned(encoded_value),
        }
    }

    /// Build a param from a value that is already percent-encoded. Existing
    /// `%XX` escapes are written out unchanged.
    pub fn pre_encoded(key: impl Into<Cow<'a, str>>, encoded: &str) -> Self {
        let encoded_value =
            percent_encoding::utf8_percent_encode(encoded, &PRE_ENCODED_ASCII_SET)
                .to_string();
        Self {
            key: key.into(),
            value: percent_decode(encoded).into_owned().into(),
            encoded_value: Cow::Owned(encoded_value),
        }
    }

    pub fn key_parsed(&'a self) -> UriParamKey<'a> {
        UriParamKey::parse(&self.key)
    }
}

// "{key}={value}"
impl fmt::Display for UriParam<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = percent_encoding::utf8_percent_encode(
            &self.key,
            &PERCENT_ENCODE_ASCII_SET,
        );
        let value = &self.encoded_value;
        write!(f, "{key}={value}")
    }
}

/// Parsed key from a URI "{key}={value}" parameter.
pub(crate) struct UriParamKey<'a> {
    /// The full key as it appeared (percent-decoded, original case). Used when
    /// reporting unknown required params.
    ///
    /// ex: "REQ-Foo" -> `raw = "REQ-Foo"`
    pub raw: &'a str,
    /// Whether this key is a required parameter. Required parameters are
    /// prefixed by "req-" (potentially mixed case).
    pub is_req: bool,
}

impl<'a> UriParamKey<'a> {
    pub fn parse(key: &'a str) -> Self {
        let is_req = key
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("req-"));
        Self { raw: key, is_req }
    }

    /// The lower-cased full key, used for dispatch and duplicate counting.
    ///
    /// ex: "REQ-Pop" -> "req-pop"
    pub fn normalized(&self) -> String {
        self.raw.to_ascii_lowercase()
    }
}

/// Percent-decode `s`. Invalid UTF-8 is replaced rather than rejected, so a
/// malformed param still shows up in the parse result.
pub(crate) fn percent_decode(s: &str) -> Cow<'_, str> {
    percent_encoding::percent_decode_str(s).decode_utf8_lossy()
}
