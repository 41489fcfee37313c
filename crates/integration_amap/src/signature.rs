//! Request signing with the account's private key
//!
//! The signature is the lowercase hex MD5 of every parameter, sorted by
//! name and joined as `k=v` with `&`, immediately followed by the private
//! key. Values are signed unencoded.

use md5::{Digest, Md5};

/// Compute the `sig` parameter for a parameter list
#[must_use]
pub fn sign<K, V>(params: &[(K, V)], private_key: &str) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    hex::encode(Md5::digest(unsigned_text(params, private_key).as_bytes()))
}

/// Text that gets hashed
fn unsigned_text<K, V>(params: &[(K, V)], private_key: &str) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{joined}{private_key}")
}
