//! `application/x-www-form-urlencoded` encoding and decoding.
//!
//! The OAuth endpoints answer with form-encoded bodies such as
//! `oauth_token=T&oauth_token_secret=S`, and the signer builds its parameter
//! sets with the same mapping type.
//!
//! Decoding is permissive: segments without `=` are dropped, the last
//! duplicate key wins, and `+` decodes to a space.
//!
//! # Example
//!
//! ```rust
//! use twitter_login::auth::oauth::form::{self, FormParams};
//!
//! let mut params = FormParams::new();
//! params.insert("oauth_callback".to_string(), "myapp://cb".to_string());
//! assert_eq!(form::encode(&params), "oauth_callback=myapp%3A%2F%2Fcb");
//!
//! let decoded = form::decode("oauth_token=T&oauth_token_secret=S&garbage");
//! assert_eq!(decoded.get("oauth_token").map(String::as_str), Some("T"));
//! assert_eq!(decoded.len(), 2);
//! ```

use std::collections::BTreeMap;

use crate::auth::oauth::percent;

/// An ordered string-to-string parameter mapping.
pub type FormParams = BTreeMap<String, String>;

/// Encodes `params` as `key=value` pairs joined by `&`.
#[must_use]
pub fn encode(params: &FormParams) -> String {
    encode_pairs(params.iter())
}

/// Encodes any sequence of pairs, preserving the given order.
#[must_use]
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", percent::encode(key), percent::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decodes a form-encoded body into a mapping.
#[must_use]
pub fn decode(body: &str) -> FormParams {
    let mut params = FormParams::new();
    for pair in body.trim().split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        params.insert(decode_component(key), decode_component(value));
    }
    params
}

fn decode_component(component: &str) -> String {
    percent::decode(&component.replace('+', " "))
}
