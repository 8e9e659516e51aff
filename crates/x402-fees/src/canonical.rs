//! Canonical signing payloads.
//!
//! A quote is projected onto every field except [`EXCLUDED_QUOTE_FIELDS`]
//! and serialized as compact JSON with keys in lexicographic order. For the
//! flat string/integer fields a quote carries this matches RFC 8785 output,
//! so signatures interoperate with peers that canonicalize with JCS.

use std::collections::BTreeMap;

use alloy::primitives::{keccak256, B256};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::constants::EXCLUDED_QUOTE_FIELDS;
use crate::quote::{FeeQuote, SignatureScheme};
use crate::FeeQuoteError;

/// Canonical JSON bytes a quote signature covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPayload {
    canonical: String,
}

impl SigningPayload {
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.canonical.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.canonical
    }

    /// Digest of the canonical bytes under `scheme`.
    ///
    /// - `eip191`: keccak-256
    /// - `ed25519`: SHA-256
    pub fn digest(&self, scheme: &SignatureScheme) -> Result<B256, FeeQuoteError> {
        match scheme {
            SignatureScheme::Eip191 => Ok(keccak256(self.as_bytes())),
            SignatureScheme::Ed25519 => Ok(B256::from_slice(
                Sha256::digest(self.as_bytes()).as_slice(),
            )),
            SignatureScheme::Unsupported(name) => {
                Err(FeeQuoteError::UnsupportedSignatureScheme(name.clone()))
            }
        }
    }
}

/// Drop excluded fields and order the remainder by key.
///
/// The explicit `BTreeMap` keeps ordering independent of whether
/// `serde_json` was built with `preserve_order`.
pub fn project_for_signing(
    fields: serde_json::Map<String, Value>,
) -> BTreeMap<String, Value> {
    fields
        .into_iter()
        .filter(|(key, _)| !EXCLUDED_QUOTE_FIELDS.contains(&key.as_str()))
        .collect()
}

/// Canonical signing payload for `quote`.
///
/// Two quotes that differ only in `quoteId`, `facilitatorAddress`,
/// `signature`, `signatureScheme` or `quoteDigest` produce identical bytes.
pub fn canonicalize_for_signing(quote: &FeeQuote) -> Result<SigningPayload, FeeQuoteError> {
    let fields = match serde_json::to_value(quote)? {
        Value::Object(fields) => fields,
        other => {
            return Err(FeeQuoteError::MalformedQuote(format!(
                "quote serialized to {other}, expected an object"
            )))
        }
    };
    let projected = project_for_signing(fields);
    Ok(SigningPayload {
        canonical: serde_json::to_string(&projected)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::BpsValue;

    fn quote() -> FeeQuote {
        FeeQuote::bps(
            "0xabc1230000000000000000000000000000000000",
            "0xfee1230000000000000000000000000000000000",
            250,
            1_900_000_000,
        )
        .with_bounds(Some("100"), Some("5000"))
        .with_quote_id("quote_abc123")
    }

    #[test]
    fn test_canonical_form() {
        let payload = canonicalize_for_signing(&quote()).unwrap();
        assert_eq!(
            payload.as_str(),
            r#"{"asset":"0xfee1230000000000000000000000000000000000","bps":250,"expiry":1900000000,"maxFee":"5000","minFee":"100","model":"bps"}"#
        );
    }

    #[test]
    fn test_identity_fields_do_not_affect_payload() {
        let a = quote();
        let mut b = quote();
        b.quote_id = Some("another".to_string());
        b.facilitator_address = "0x0000000000000000000000000000000000000001".to_string();
        b.signature = Some("0xdeadbeef".to_string());
        b.signature_scheme = Some(SignatureScheme::Ed25519);
        b.quote_digest = Some("0x00".to_string());

        assert_eq!(
            canonicalize_for_signing(&a).unwrap(),
            canonicalize_for_signing(&b).unwrap()
        );
    }

    #[test]
    fn test_pricing_fields_affect_payload() {
        let a = quote();
        let mut b = quote();
        b.max_fee = Some("5001".to_string());
        assert_ne!(
            canonicalize_for_signing(&a).unwrap(),
            canonicalize_for_signing(&b).unwrap()
        );
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        let first = canonicalize_for_signing(&quote()).unwrap();
        let reparsed: BTreeMap<String, Value> = serde_json::from_str(first.as_str()).unwrap();
        let second = serde_json::to_string(&reparsed).unwrap();
        assert_eq!(first.as_str(), second);
    }

    #[test]
    fn test_string_bps_is_kept_as_string() {
        let mut q = quote();
        q.bps = Some(BpsValue::Text("250".to_string()));
        let payload = canonicalize_for_signing(&q).unwrap();
        assert!(payload.as_str().contains(r#""bps":"250""#));
    }

    #[test]
    fn test_digest_per_scheme() {
        let payload = canonicalize_for_signing(&quote()).unwrap();
        let k = payload.digest(&SignatureScheme::Eip191).unwrap();
        let s = payload.digest(&SignatureScheme::Ed25519).unwrap();
        assert_eq!(k, keccak256(payload.as_bytes()));
        assert_ne!(k, s);
        assert!(matches!(
            payload.digest(&SignatureScheme::Unsupported("x".to_string())),
            Err(FeeQuoteError::UnsupportedSignatureScheme(_))
        ));
    }

    #[test]
    fn test_sha256_known_vector() {
        let payload = SigningPayload {
            canonical: "abc".to_string(),
        };
        let digest = payload.digest(&SignatureScheme::Ed25519).unwrap();
        assert_eq!(
            alloy::hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
