//! # ERP Request Signing
//!
//! The ERP API authenticates every request with an HMAC-SHA256 signature over
//! the request's URL query string (empty for the endpoints these jobs use),
//! keyed by the shared API key and base64-encoded into the
//! `api-auth-signature` header.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the base64 `api-auth-signature` value for a query string.
pub fn signature(url_params: &str, api_key: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(api_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(url_params.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // RFC-style HMAC-SHA256 vector, base64-encoded.
        assert_eq!(
            signature("The quick brown fox jumps over the lazy dog", "key"),
            "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg="
        );
    }

    #[test]
    fn test_empty_params() {
        // The observed usage always signs an empty query string.
        assert_eq!(
            signature("", "secret"),
            "+eZuF5tnR65UEI+C+K3os8Jddv0wr95sOVgixTAZYWk="
        );
    }

    #[test]
    fn test_key_changes_signature() {
        assert_ne!(signature("", "key-a"), signature("", "key-b"));
    }
}
