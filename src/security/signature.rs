//! HMAC-SHA256 webhook signing and verification.
//!
//! The verifier never errors: every failure path is `false`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex signature of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Compute the lowercase hex HMAC-SHA256 of `message` keyed by `secret`.
pub fn sign(secret: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Check `signature` against the expected signature of `message`.
///
/// Absent or empty signatures fail closed.
pub fn verify(secret: &[u8], message: &[u8], signature: Option<&str>) -> bool {
    let signature = match signature {
        Some(s) if !s.is_empty() => s,
        _ => return false,
    };
    let expected = sign(secret, message);
    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

/// Like [`verify`], for senders that prefix the digest (e.g. `sha256=<hex>`).
pub fn verify_prefixed(
    secret: &[u8],
    message: &[u8],
    signature: Option<&str>,
    prefix: &str,
) -> bool {
    match signature.and_then(|s| s.strip_prefix(prefix)) {
        Some(digest) => verify(secret, message, Some(digest)),
        None => false,
    }
}

/// Byte comparison whose running time depends only on the input lengths.
///
/// A length mismatch returns `false` immediately; length is not secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
