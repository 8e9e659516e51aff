//! Quote signing.
//!
//! [`QuoteSigner`] is the seam between the canonical payload and a key. The
//! crate ships [`crate::Eip191QuoteSigner`] and [`crate::Ed25519QuoteSigner`];
//! remote or hardware signers can implement the trait themselves.

use alloy::primitives::B256;

use crate::canonical::canonicalize_for_signing;
use crate::quote::{FeeQuote, SignatureScheme};
use crate::FeeQuoteError;

/// Facilitator-side signer: signs the digest of a canonical quote payload.
pub trait QuoteSigner: Send + Sync {
    /// Scheme this signer produces; decides the digest function.
    fn scheme(&self) -> SignatureScheme;

    /// Identity a verifier checks against: an address for `eip191`, the
    /// hex verifying key for `ed25519`.
    fn signer_id(&self) -> String;

    /// Raw signature bytes over `digest`.
    fn sign_digest(&self, digest: &B256) -> Result<Vec<u8>, FeeQuoteError>;
}

/// Sign `quote`, returning a copy with `signature`, `signatureScheme` and
/// `quoteDigest` populated. Any previous signature fields are replaced.
pub fn sign_quote<S>(quote: &FeeQuote, signer: &S) -> Result<FeeQuote, FeeQuoteError>
where
    S: QuoteSigner + ?Sized,
{
    quote.validate()?;

    let scheme = signer.scheme();
    let payload = canonicalize_for_signing(quote)?;
    let digest = payload.digest(&scheme)?;
    let signature = signer.sign_digest(&digest)?;

    if scheme == SignatureScheme::Eip191
        && !quote
            .facilitator_address
            .eq_ignore_ascii_case(&signer.signer_id())
    {
        tracing::warn!(
            facilitator = %quote.facilitator_address,
            signer = %signer.signer_id(),
            "facilitatorAddress does not match the signing key"
        );
    }

    let mut signed = quote.clone();
    signed.signature = Some(format!("0x{}", alloy::hex::encode(&signature)));
    signed.quote_digest = Some(format!("0x{}", alloy::hex::encode(digest)));

    tracing::debug!(%scheme, canonical = payload.as_str(), "signed fee quote");
    signed.signature_scheme = Some(scheme);

    Ok(signed)
}
