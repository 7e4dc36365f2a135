//! Request signing for providers that authenticate with asymmetric keys.
//!
//! TNG Digital expects an RSA-SHA256 (PKCS#1 v1.5) signature over the exact
//! serialized request body. The caller serializes the body once, signs those
//! bytes, and sends the same buffer on the wire; re-serializing after signing
//! would invalidate the signature.

use base64::prelude::*;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;

use crate::core::error::{AppError, Result};

pub struct SigningService;

impl SigningService {
    /// Accepts both PKCS#8 ("BEGIN PRIVATE KEY") and PKCS#1
    /// ("BEGIN RSA PRIVATE KEY") PEM encodings.
    fn private_key_from_pem(pem: &str) -> Result<RsaPrivateKey> {
        match RsaPrivateKey::from_pkcs8_pem(pem) {
            Ok(key) => Ok(key),
            Err(_) => RsaPrivateKey::from_pkcs1_pem(pem).map_err(|e| {
                AppError::configuration(format!("Invalid RSA private key: {}", e))
            }),
        }
    }

    /// RSA-SHA256 signature over `body`, base64-encoded.
    ///
    /// PKCS#1 v1.5 padding is deterministic: the same key and body always
    /// produce the same signature, and any single-byte change to the body
    /// produces a different one.
    pub fn sign(body: &[u8], private_key_pem: &str) -> Result<String> {
        let key = Self::private_key_from_pem(private_key_pem)?;
        let signing_key = SigningKey::<Sha256>::new(key);
        let signature = signing_key
            .try_sign(body)
            .map_err(|e| AppError::internal(format!("RSA signing failed: {}", e)))?;
        Ok(BASE64_STANDARD.encode(signature.to_bytes()))
    }

    /// `Signature` header value in the format TNG Digital expects.
    pub fn signature_header(signature_b64: &str) -> String {
        format!(
            "algorithm=RSA256, keyVersion=1, signature={}",
            signature_b64
        )
    }
}
