//! EIP-191 quote signatures over secp256k1.
//!
//! The signer signs the 32-byte keccak-256 digest of the canonical payload as
//! an Ethereum personal message (`"\x19Ethereum Signed Message:\n32" ||
//! digest`). Verification recovers the signer address and compares it with
//! the expected one.

use alloy::primitives::{Address, Signature, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::quote::SignatureScheme;
use crate::signer::QuoteSigner;
use crate::FeeQuoteError;

/// secp256k1 curve order N / 2. Signatures with s > this are malleable (EIP-2).
const SECP256K1_N_DIV_2: U256 = U256::from_limbs([
    0xBFD25E8CD0364140,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0x7FFFFFFFFFFFFFFF,
]);

/// Quote signer backed by a local secp256k1 key.
pub struct Eip191QuoteSigner {
    inner: PrivateKeySigner,
}

impl Eip191QuoteSigner {
    /// Create a signer from a hex-encoded private key (with or without 0x prefix).
    pub fn from_hex(private_key: &str) -> Result<Self, FeeQuoteError> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let inner: PrivateKeySigner = key
            .parse()
            .map_err(|e| FeeQuoteError::InvalidKey(format!("invalid secp256k1 key: {e}")))?;
        Ok(Self { inner })
    }

    pub fn random() -> Self {
        Self {
            inner: PrivateKeySigner::random(),
        }
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }
}

impl QuoteSigner for Eip191QuoteSigner {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Eip191
    }

    fn signer_id(&self) -> String {
        self.inner.address().to_string()
    }

    fn sign_digest(&self, digest: &B256) -> Result<Vec<u8>, FeeQuoteError> {
        let sig = self
            .inner
            .sign_message_sync(digest.as_slice())
            .map_err(|e| FeeQuoteError::InvalidKey(format!("signing failed: {e}")))?;
        Ok(sig.as_bytes().to_vec())
    }
}

/// Recover the address that signed `digest` as an EIP-191 personal message.
/// Rejects high-s signatures to prevent malleability (EIP-2).
pub fn recover_signer(digest: &B256, signature_bytes: &[u8]) -> Result<Address, FeeQuoteError> {
    if signature_bytes.len() != 65 {
        return Err(FeeQuoteError::SignatureMismatch(format!(
            "signature must be 65 bytes, got {}",
            signature_bytes.len()
        )));
    }

    // from_raw folds EIP-155 style v values into a parity bit; only the
    // personal-message forms are valid here.
    let v = signature_bytes[64];
    if !matches!(v, 0 | 1 | 27 | 28) {
        return Err(FeeQuoteError::SignatureMismatch(format!(
            "invalid recovery id v={v}"
        )));
    }

    let sig = Signature::from_raw(signature_bytes)
        .map_err(|e| FeeQuoteError::SignatureMismatch(format!("invalid signature: {e}")))?;

    if sig.s() > SECP256K1_N_DIV_2 {
        return Err(FeeQuoteError::SignatureMismatch(
            "high-s signature rejected (EIP-2 malleability)".to_string(),
        ));
    }

    sig.recover_address_from_msg(digest.as_slice())
        .map_err(|e| FeeQuoteError::SignatureMismatch(format!("recovery failed: {e}")))
}

/// Parse an expected signer address. Case is ignored; no checksum is enforced.
pub fn parse_expected_address(expected: &str) -> Result<Address, FeeQuoteError> {
    expected
        .trim()
        .parse::<Address>()
        .map_err(|e| FeeQuoteError::InvalidKey(format!("invalid signer address '{expected}': {e}")))
}

/// Verify that `signature_bytes` over `digest` was produced by `expected`.
pub fn verify(
    digest: &B256,
    signature_bytes: &[u8],
    expected: &str,
) -> Result<(), FeeQuoteError> {
    let expected = parse_expected_address(expected)?;
    let recovered = recover_signer(digest, signature_bytes)?;
    if recovered != expected {
        return Err(FeeQuoteError::SignatureMismatch(format!(
            "recovered {recovered}, expected {expected}"
        )));
    }
    Ok(())
}
