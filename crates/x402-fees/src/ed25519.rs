//! Ed25519 quote signatures.
//!
//! The signer signs the 32-byte SHA-256 digest of the canonical payload.
//! Ed25519 has no key recovery, so the expected signer is the verifying key
//! itself: hex-encoded (32 bytes) or an SPKI PEM document.

use alloy::primitives::B256;
use ed25519_dalek::pkcs8::{DecodePrivateKey, DecodePublicKey};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

use crate::quote::SignatureScheme;
use crate::signer::QuoteSigner;
use crate::FeeQuoteError;

const PEM_MARKER: &str = "-----BEGIN";

/// Quote signer backed by a local Ed25519 key.
pub struct Ed25519QuoteSigner {
    key: SigningKey,
}

impl Ed25519QuoteSigner {
    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(secret),
        }
    }

    /// Load a 32-byte secret from hex (with or without 0x prefix).
    pub fn from_hex(secret: &str) -> Result<Self, FeeQuoteError> {
        let bytes = decode_key_hex(secret)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Load a PKCS#8 PEM private key.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, FeeQuoteError> {
        let key = SigningKey::from_pkcs8_pem(pem.trim())
            .map_err(|e| FeeQuoteError::InvalidKey(format!("invalid ed25519 PKCS#8 key: {e}")))?;
        Ok(Self { key })
    }

    /// Accept either a PEM document or a hex secret.
    pub fn parse(material: &str) -> Result<Self, FeeQuoteError> {
        if material.contains(PEM_MARKER) {
            Self::from_pkcs8_pem(material)
        } else {
            Self::from_hex(material)
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// Hex-encoded verifying key with 0x prefix.
    pub fn verifying_key_hex(&self) -> String {
        format!("0x{}", alloy::hex::encode(self.key.verifying_key().to_bytes()))
    }
}

impl QuoteSigner for Ed25519QuoteSigner {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn signer_id(&self) -> String {
        self.verifying_key_hex()
    }

    fn sign_digest(&self, digest: &B256) -> Result<Vec<u8>, FeeQuoteError> {
        Ok(self.key.sign(digest.as_slice()).to_bytes().to_vec())
    }
}

fn decode_key_hex(material: &str) -> Result<[u8; 32], FeeQuoteError> {
    let trimmed = material.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = alloy::hex::decode(hex)
        .map_err(|e| FeeQuoteError::InvalidKey(format!("invalid ed25519 key hex: {e}")))?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        FeeQuoteError::InvalidKey(format!(
            "ed25519 key must be 32 bytes, got {}",
            bytes.len()
        ))
    })
}

/// Parse a verifying key from an SPKI PEM document or 32-byte hex.
pub fn parse_verifying_key(material: &str) -> Result<VerifyingKey, FeeQuoteError> {
    if material.contains(PEM_MARKER) {
        return VerifyingKey::from_public_key_pem(material.trim()).map_err(|e| {
            FeeQuoteError::InvalidKey(format!("invalid ed25519 public key PEM: {e}"))
        });
    }
    let bytes = decode_key_hex(material)?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| FeeQuoteError::InvalidKey(format!("invalid ed25519 public key: {e}")))
}

/// Verify that `signature_bytes` over `digest` was produced by the key `expected`.
pub fn verify(
    digest: &B256,
    signature_bytes: &[u8],
    expected: &str,
) -> Result<(), FeeQuoteError> {
    let key = parse_verifying_key(expected)?;
    let sig = Signature::from_slice(signature_bytes).map_err(|_| {
        FeeQuoteError::SignatureMismatch(format!(
            "signature must be 64 bytes, got {}",
            signature_bytes.len()
        ))
    })?;
    key.verify_strict(digest.as_slice(), &sig)
        .map_err(|_| FeeQuoteError::SignatureMismatch("ed25519 verification failed".to_string()))
}
