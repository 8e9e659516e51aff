//! Environment configuration and key loading for the quote tools.

use std::path::Path;

use crate::ed25519::Ed25519QuoteSigner;
use crate::eip191::Eip191QuoteSigner;
use crate::quote::SignatureScheme;
use crate::signer::QuoteSigner;
use crate::FeeQuoteError;

/// Signing key (PEM, hex, or a path to either).
pub const PRIVATE_KEY_ENV: &str = "FACILITATOR_PRIVATE_KEY";

/// Verifying key or signer address (PEM, hex, address, or a path).
pub const PUBLIC_KEY_ENV: &str = "FACILITATOR_PUBLIC_KEY";

/// Default scheme for signing when `--scheme` is not given.
pub const SCHEME_ENV: &str = "QUOTE_SIGNATURE_SCHEME";

/// Settings the quote tools read from the environment.
#[derive(Debug, Clone)]
pub struct QuoteToolConfig {
    pub private_key: Option<String>,
    pub public_key: Option<String>,
    pub scheme: SignatureScheme,
}

impl QuoteToolConfig {
    pub fn from_env() -> Self {
        let private_key = std::env::var(PRIVATE_KEY_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty());
        let public_key = std::env::var(PUBLIC_KEY_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty());

        let scheme = match std::env::var(SCHEME_ENV) {
            Ok(name) => match name.parse::<SignatureScheme>() {
                Ok(scheme) => scheme,
                Err(e) => {
                    tracing::warn!("{SCHEME_ENV}: {e} -- falling back to ed25519");
                    SignatureScheme::Ed25519
                }
            },
            Err(_) => SignatureScheme::Ed25519,
        };

        Self {
            private_key,
            public_key,
            scheme,
        }
    }
}

/// Key material given inline, or the contents of the file it names.
pub fn resolve_key_material(value: &str) -> Result<String, FeeQuoteError> {
    let path = Path::new(value.trim());
    if path.is_file() {
        let contents = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded key material from file");
        return Ok(contents.trim().to_string());
    }
    Ok(value.trim().to_string())
}

/// Build a signer for `scheme` from resolved key material.
pub fn signer_from_key(
    scheme: &SignatureScheme,
    material: &str,
) -> Result<Box<dyn QuoteSigner>, FeeQuoteError> {
    match scheme {
        SignatureScheme::Eip191 => Ok(Box::new(Eip191QuoteSigner::from_hex(material)?)),
        SignatureScheme::Ed25519 => Ok(Box::new(Ed25519QuoteSigner::parse(material)?)),
        SignatureScheme::Unsupported(name) => {
            Err(FeeQuoteError::UnsupportedSignatureScheme(name.clone()))
        }
    }
}

/// Install the stderr tracing subscriber used by the binaries.
#[cfg(feature = "full")]
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
