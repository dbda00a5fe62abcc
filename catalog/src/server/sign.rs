//! Short-lived write authorizations.
//!
//! An authorization covers one key, one content type, and an expiry
//! instant. The signature is HMAC-SHA-256 over those three fields with a
//! server-held secret, hex-encoded into the signed URL's query string.
//! The transfer endpoint recomputes it from the incoming request, so a
//! tampered key, a swapped content type, or an extended expiry all fail
//! verification.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// How long an issued authorization stays valid.
pub const AUTHORIZATION_TTL_SECS: i64 = 900;

/// Why a presented signature was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    Expired,
    Invalid,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureError::Expired => write!(f, "authorization expired"),
            SignatureError::Invalid => write!(f, "signature mismatch"),
        }
    }
}

/// Issues and verifies upload authorizations.
#[derive(Clone)]
pub struct UrlSigner {
    secret: Arc<Vec<u8>>,
}

impl UrlSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Arc::new(secret.as_ref().to_vec()),
        }
    }

    fn mac(&self, key: &str, content_type: &str, expires_at: i64) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(content_type.as_bytes());
        mac.update(b"\n");
        mac.update(expires_at.to_string().as_bytes());
        mac
    }

    /// Hex signature authorizing a PUT of `content_type` bytes to `key`
    /// until `expires_at` (unix seconds).
    pub fn sign(&self, key: &str, content_type: &str, expires_at: i64) -> String {
        hex::encode(self.mac(key, content_type, expires_at).finalize().into_bytes())
    }

    /// Check a presented signature against the request parameters.
    pub fn verify(
        &self,
        key: &str,
        content_type: &str,
        expires_at: i64,
        signature: &str,
        now: i64,
    ) -> Result<(), SignatureError> {
        if now >= expires_at {
            return Err(SignatureError::Expired);
        }
        let presented = hex::decode(signature).map_err(|_| SignatureError::Invalid)?;
        self.mac(key, content_type, expires_at)
            .verify_slice(&presented)
            .map_err(|_| SignatureError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> UrlSigner {
        UrlSigner::new("test-secret")
    }

    #[test]
    fn should_accept_its_own_signature() {
        // given
        let signer = signer();
        let sig = signer.sign("images/recipes/r1/thumb.webp", "image/webp", 1000);

        // when
        let result = signer.verify("images/recipes/r1/thumb.webp", "image/webp", 1000, &sig, 500);

        // then
        assert!(result.is_ok());
    }

    #[test]
    fn should_reject_expired_authorization() {
        // given
        let signer = signer();
        let sig = signer.sign("k", "image/webp", 1000);

        // when
        let result = signer.verify("k", "image/webp", 1000, &sig, 1000);

        // then
        assert_eq!(result, Err(SignatureError::Expired));
    }

    #[test]
    fn should_reject_tampered_key() {
        // given
        let signer = signer();
        let sig = signer.sign("images/recipes/r1/thumb.webp", "image/webp", 1000);

        // when
        let result = signer.verify("images/recipes/r2/thumb.webp", "image/webp", 1000, &sig, 500);

        // then
        assert_eq!(result, Err(SignatureError::Invalid));
    }

    #[test]
    fn should_reject_swapped_content_type() {
        // given
        let signer = signer();
        let sig = signer.sign("k", "image/webp", 1000);

        // when
        let result = signer.verify("k", "text/html", 1000, &sig, 500);

        // then
        assert_eq!(result, Err(SignatureError::Invalid));
    }

    #[test]
    fn should_reject_garbage_signatures() {
        // given
        let signer = signer();

        // when
        let not_hex = signer.verify("k", "image/webp", 1000, "zz-not-hex", 500);
        let wrong = signer.verify("k", "image/webp", 1000, "deadbeef", 500);

        // then
        assert_eq!(not_hex, Err(SignatureError::Invalid));
        assert_eq!(wrong, Err(SignatureError::Invalid));
    }

    #[test]
    fn should_reject_signatures_from_other_secrets() {
        // given
        let sig = UrlSigner::new("secret-a").sign("k", "image/webp", 1000);

        // when
        let result = UrlSigner::new("secret-b").verify("k", "image/webp", 1000, &sig, 500);

        // then
        assert_eq!(result, Err(SignatureError::Invalid));
    }
}
