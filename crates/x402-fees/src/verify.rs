//! Quote verification.
//!
//! Verification is a predicate plus error classification: a valid quote
//! yields `Ok(())`, anything else one [`FeeQuoteError`] variant. The only
//! input besides the quote and expected signer is the current time, which
//! callers pass explicitly.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::B256;

use crate::canonical::canonicalize_for_signing;
use crate::quote::{FeeQuote, SignatureScheme};
use crate::{ed25519, eip191, FeeQuoteError};

/// Current Unix time in seconds. Clocks before the epoch read as zero.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// A quote is valid through its `expiry` second and stale after it.
pub fn is_quote_expired(quote: &FeeQuote, now: u64) -> bool {
    now > quote.expiry
}

fn decode_hex_field(field: &str, value: &str) -> Result<Vec<u8>, FeeQuoteError> {
    let hex = value.strip_prefix("0x").unwrap_or(value);
    alloy::hex::decode(hex)
        .map_err(|e| FeeQuoteError::MalformedQuote(format!("{field} is not valid hex: {e}")))
}

/// Verify a signed quote against `expected_signer` at `current_time`.
///
/// 1. the scheme must be `eip191` or `ed25519`
/// 2. `current_time` must not be past `expiry`
/// 3. the canonical payload is digested per scheme; a `quoteDigest` on the
///    quote must equal that digest
/// 4. the signature must verify for `expected_signer`
///
/// For `eip191` the expected signer is an address, compared
/// case-insensitively against the recovered one. For `ed25519` it is the
/// verifying key as hex or SPKI PEM.
pub fn verify_quote(
    quote: &FeeQuote,
    expected_signer: &str,
    current_time: u64,
) -> Result<(), FeeQuoteError> {
    let scheme = match &quote.signature_scheme {
        Some(SignatureScheme::Unsupported(name)) => {
            tracing::warn!(scheme = %name, "rejecting quote with unsupported scheme");
            return Err(FeeQuoteError::UnsupportedSignatureScheme(name.clone()));
        }
        Some(scheme) => scheme,
        None => {
            return Err(FeeQuoteError::UnsupportedSignatureScheme(
                "signatureScheme is missing".to_string(),
            ))
        }
    };

    if is_quote_expired(quote, current_time) {
        tracing::warn!(
            quote_id = quote.quote_id.as_deref().unwrap_or("-"),
            expiry = quote.expiry,
            now = current_time,
            "rejecting expired quote"
        );
        return Err(FeeQuoteError::QuoteExpired {
            expiry: quote.expiry,
            now: current_time,
        });
    }

    let signature_hex = quote.signature.as_deref().ok_or_else(|| {
        FeeQuoteError::MalformedQuote("signature is missing".to_string())
    })?;
    let signature = decode_hex_field("signature", signature_hex)?;

    let payload = canonicalize_for_signing(quote)?;
    let digest = payload.digest(scheme)?;

    if let Some(declared) = &quote.quote_digest {
        let declared = decode_hex_field("quoteDigest", declared)?;
        if declared.as_slice() != digest.as_slice() {
            return Err(FeeQuoteError::SignatureMismatch(
                "quoteDigest does not match the canonical payload".to_string(),
            ));
        }
    }

    verify_digest(scheme, &digest, &signature, expected_signer)?;

    tracing::debug!(
        quote_id = quote.quote_id.as_deref().unwrap_or("-"),
        %scheme,
        "fee quote verified"
    );
    Ok(())
}

fn verify_digest(
    scheme: &SignatureScheme,
    digest: &B256,
    signature: &[u8],
    expected_signer: &str,
) -> Result<(), FeeQuoteError> {
    match scheme {
        SignatureScheme::Eip191 => eip191::verify(digest, signature, expected_signer),
        SignatureScheme::Ed25519 => ed25519::verify(digest, signature, expected_signer),
        SignatureScheme::Unsupported(name) => {
            Err(FeeQuoteError::UnsupportedSignatureScheme(name.clone()))
        }
    }
}

/// [`verify_quote`] against the system clock.
pub fn verify_quote_now(quote: &FeeQuote, expected_signer: &str) -> Result<(), FeeQuoteError> {
    verify_quote(quote, expected_signer, unix_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::{sign_quote, QuoteSigner};
    use crate::{Ed25519QuoteSigner, Eip191QuoteSigner};

    const EXPIRY: u64 = 1_900_000_000;

    fn signed_eip191() -> (FeeQuote, String) {
        let signer = Eip191QuoteSigner::random();
        let quote = FeeQuote::bps(signer.signer_id(), "0xfee", 250, EXPIRY)
            .with_bounds(Some("100"), Some("5000"))
            .with_quote_id("quote_1");
        (sign_quote(&quote, &signer).unwrap(), signer.signer_id())
    }

    #[test]
    fn test_unsupported_scheme() {
        let (mut quote, signer) = signed_eip191();
        quote.signature_scheme = Some(SignatureScheme::Unsupported("rsa".to_string()));
        assert!(matches!(
            verify_quote(&quote, &signer, EXPIRY),
            Err(FeeQuoteError::UnsupportedSignatureScheme(_))
        ));
    }

    #[test]
    fn test_missing_scheme_is_unsupported() {
        let (mut quote, signer) = signed_eip191();
        quote.signature_scheme = None;
        assert!(matches!(
            verify_quote(&quote, &signer, EXPIRY),
            Err(FeeQuoteError::UnsupportedSignatureScheme(_))
        ));
    }

    #[test]
    fn test_expiry_boundary() {
        let (quote, signer) = signed_eip191();
        verify_quote(&quote, &signer, EXPIRY).unwrap();
        assert!(matches!(
            verify_quote(&quote, &signer, EXPIRY + 1),
            Err(FeeQuoteError::QuoteExpired { .. })
        ));
    }

    #[test]
    fn test_missing_signature_is_malformed() {
        let (mut quote, signer) = signed_eip191();
        quote.signature = None;
        assert!(matches!(
            verify_quote(&quote, &signer, EXPIRY),
            Err(FeeQuoteError::MalformedQuote(_))
        ));
    }

    #[test]
    fn test_non_hex_signature_is_malformed() {
        let (mut quote, signer) = signed_eip191();
        quote.signature = Some("0xSIG_FROM_SIGNER".to_string());
        assert!(matches!(
            verify_quote(&quote, &signer, EXPIRY),
            Err(FeeQuoteError::MalformedQuote(_))
        ));
    }

    #[test]
    fn test_tampered_pricing_is_mismatch() {
        let (mut quote, signer) = signed_eip191();
        quote.max_fee = Some("9000".to_string());
        assert!(matches!(
            verify_quote(&quote, &signer, EXPIRY),
            Err(FeeQuoteError::SignatureMismatch(_))
        ));
    }

    #[test]
    fn test_tampered_pricing_without_digest_is_mismatch() {
        let (mut quote, signer) = signed_eip191();
        quote.quote_digest = None;
        quote.max_fee = Some("9000".to_string());
        assert!(matches!(
            verify_quote(&quote, &signer, EXPIRY),
            Err(FeeQuoteError::SignatureMismatch(_))
        ));
    }

    #[test]
    fn test_digest_is_optional() {
        let (mut quote, signer) = signed_eip191();
        quote.quote_digest = None;
        verify_quote(&quote, &signer, EXPIRY).unwrap();
    }

    #[test]
    fn test_ed25519_quote() {
        let signer = Ed25519QuoteSigner::from_bytes(&[9u8; 32]);
        let quote = FeeQuote::flat("facilitator-1", "0xfee", "1000", EXPIRY);
        let signed = sign_quote(&quote, &signer).unwrap();
        verify_quote(&signed, &signer.signer_id(), EXPIRY - 10).unwrap();
    }

    #[test]
    fn test_verification_is_deterministic() {
        let (quote, signer) = signed_eip191();
        let first = verify_quote(&quote, &signer, EXPIRY + 5).map_err(|e| e.to_string());
        let second = verify_quote(&quote, &signer, EXPIRY + 5).map_err(|e| e.to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unix_now_is_after_2020() {
        assert!(unix_now() > 1_577_836_800);
    }
}
