//! LINE webhook signature verification.
//!
//! LINE signs every webhook request body with HMAC-SHA256 keyed by the
//! channel secret and sends the base64 digest in the `X-Line-Signature`
//! header.
//! Reference: https://developers.line.biz/en/reference/messaging-api/#signature-validation

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Compute the base64 HMAC-SHA256 signature of `body`.
///
/// Does not panic: HMAC pads or hashes the key to its block size, so
/// `new_from_slice` accepts keys of any length, including empty ones.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify a LINE webhook signature against the raw request body.
///
/// The body must be the exact bytes received; re-serialized JSON will not
/// match. The digest comparison runs in constant time.
///
/// # Returns
///
/// `true` if `signature` is the base64 HMAC-SHA256 of `body` under
/// `channel_secret`, `false` otherwise.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    if channel_secret.is_empty() || signature.is_empty() {
        warn!(
            has_channel_secret = !channel_secret.is_empty(),
            has_signature = !signature.is_empty(),
            "line_signature_missing_fields"
        );
        return false;
    }

    let provided = match STANDARD.decode(signature.trim()) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(signature_length = signature.len(), "line_signature_not_base64");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("line_signature_invalid_key");
            return false;
        }
    };
    mac.update(body);

    let valid = mac.verify_slice(&provided).is_ok();
    if !valid {
        warn!(
            body_length = body.len(),
            provided_length = provided.len(),
            "line_signature_mismatch"
        );
    }

    valid
}
