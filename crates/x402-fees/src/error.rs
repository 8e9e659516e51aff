use thiserror::Error;

/// Errors returned by fee quote operations.
///
/// Every variant is terminal for the call that raised it: a stale or
/// invalid quote has to be reissued by the facilitator.
#[derive(Debug, Error)]
pub enum FeeQuoteError {
    #[error("invalid fee model: {0}")]
    InvalidFeeModel(String),

    #[error("quote expired at {expiry} (now {now})")]
    QuoteExpired { expiry: u64, now: u64 },

    #[error("unsupported signature scheme: {0}")]
    UnsupportedSignatureScheme(String),

    #[error("signature mismatch: {0}")]
    SignatureMismatch(String),

    #[error("malformed quote: {0}")]
    MalformedQuote(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("settlement does not match selection: {0}")]
    SettlementMismatch(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_error_converts() {
        let err: FeeQuoteError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, FeeQuoteError::Serde(_)));
        assert!(err.to_string().starts_with("serialization error"));
    }
}
