//! RFC 3986 percent-encoding for OAuth 1.0a.
//!
//! Two encoders live here:
//!
//! - [`encode`] is the strict parameter encoder used for signature base
//!   strings, signing keys, `Authorization` headers and form bodies. Only the
//!   unreserved set `A-Z a-z 0-9 - . _ ~` passes through; every other UTF-8
//!   byte becomes `%XX` with uppercase hex.
//! - [`escape_uri`] touches an already-assembled URL and escapes only
//!   `! ' ( ) *`, which some HTTP stacks leave alone. It never re-escapes `%`
//!   or reserved delimiters, so applying it twice is the same as applying it once.
//!
//! # Example
//!
//! ```rust
//! use twitter_login::auth::oauth::percent;
//!
//! assert_eq!(percent::encode("hello world!'()*"), "hello%20world%21%27%28%29%2A");
//! assert_eq!(percent::encode("-._~"), "-._~");
//!
//! let url = "https://api.twitter.com/1.1/search.json?q=(rust)";
//! let escaped = percent::escape_uri(url);
//! assert_eq!(escaped, "https://api.twitter.com/1.1/search.json?q=%28rust%29");
//! assert_eq!(percent::escape_uri(&escaped), escaped);
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the RFC 3986 unreserved characters.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes `raw` for use in OAuth signatures and form bodies.
#[must_use]
pub fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, OAUTH_ENCODE_SET).to_string()
}

/// Percent-decodes `encoded`.
///
/// Invalid escape sequences are kept verbatim and invalid UTF-8 is replaced
/// with U+FFFD; decoding never fails.
#[must_use]
pub fn decode(encoded: &str) -> String {
    let bytes = urlencoding::decode_binary(encoded.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Escapes the sub-delimiters `! ' ( ) *` in an assembled URL.
#[must_use]
pub fn escape_uri(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '!' => escaped.push_str("%21"),
            '\'' => escaped.push_str("%27"),
            '(' => escaped.push_str("%28"),
            ')' => escaped.push_str("%29"),
            '*' => escaped.push_str("%2A"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_escapes_special_characters() {
        let encoded = encode("hello world!'()*");
        assert_eq!(encoded, "hello%20world%21%27%28%29%2A");
    }

    #[test]
    fn test_encode_keeps_unreserved_characters() {
        let unreserved = "ABCXYZabcxyz0189-._~";
        assert_eq!(encode(unreserved), unreserved);
    }

    #[test]
    fn test_encode_oauth_delimiters() {
        assert_eq!(encode("a=b&c"), "a%3Db%26c");
        assert_eq!(encode("https://x/y?z"), "https%3A%2F%2Fx%2Fy%3Fz");
        assert_eq!(encode("1+1"), "1%2B1");
        assert_eq!(encode("100%"), "100%25");
    }

    #[test]
    fn test_encode_empty_string() {
        assert_eq!(encode(""), "");
    }

    #[test]
    fn test_encode_non_ascii_encodes_each_utf8_byte() {
        assert_eq!(encode("é"), "%C3%A9");
        assert_eq!(encode("☃"), "%E2%98%83");
    }

    #[test]
    fn test_decode_reverses_encode() {
        let raw = "Ladies + Gentlemen & ☃!";
        assert_eq!(decode(&encode(raw)), raw);
    }

    #[test]
    fn test_decode_keeps_invalid_sequences() {
        assert_eq!(decode("100%"), "100%");
        assert_eq!(decode("%zz"), "%zz");
    }

    #[test]
    fn test_escape_uri_is_idempotent() {
        let url = "https://api.twitter.com/1.1/statuses/update.json?status=Hi!%20(again)*'";
        let once = escape_uri(url);
        assert_eq!(
            once,
            "https://api.twitter.com/1.1/statuses/update.json?status=Hi%21%20%28again%29%2A%27"
        );
        assert_eq!(escape_uri(&once), once);
    }

    #[test]
    fn test_escape_uri_leaves_delimiters() {
        let url = "https://x.com/a/b?c=d&e=f#g";
        assert_eq!(escape_uri(url), url);
    }
}
