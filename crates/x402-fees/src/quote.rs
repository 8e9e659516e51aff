use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::amount::{parse_amount, validate_amount};
use crate::constants::{SCHEME_ED25519, SCHEME_EIP191};
use crate::FeeQuoteError;

/// Pricing model declared by a facilitator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeModel {
    Flat,
    Bps,
    Tiered,
    Hybrid,
}

impl fmt::Display for FeeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeeModel::Flat => "flat",
            FeeModel::Bps => "bps",
            FeeModel::Tiered => "tiered",
            FeeModel::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Signature scheme named by a quote.
///
/// Unknown names deserialize into [`SignatureScheme::Unsupported`] so that
/// verification can report them as an unsupported scheme rather than a
/// parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignatureScheme {
    Eip191,
    Ed25519,
    Unsupported(String),
}

impl SignatureScheme {
    pub fn as_str(&self) -> &str {
        match self {
            SignatureScheme::Eip191 => SCHEME_EIP191,
            SignatureScheme::Ed25519 => SCHEME_ED25519,
            SignatureScheme::Unsupported(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, SignatureScheme::Unsupported(_))
    }
}

impl From<String> for SignatureScheme {
    fn from(name: String) -> Self {
        match name.as_str() {
            SCHEME_EIP191 => SignatureScheme::Eip191,
            SCHEME_ED25519 => SignatureScheme::Ed25519,
            _ => SignatureScheme::Unsupported(name),
        }
    }
}

impl From<SignatureScheme> for String {
    fn from(scheme: SignatureScheme) -> Self {
        match scheme {
            SignatureScheme::Unsupported(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

/// Strict parse: only supported scheme names are accepted.
impl FromStr for SignatureScheme {
    type Err = FeeQuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match SignatureScheme::from(s.to_string()) {
            SignatureScheme::Unsupported(name) => {
                Err(FeeQuoteError::UnsupportedSignatureScheme(name))
            }
            scheme => Ok(scheme),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basis-point rate as it appeared on the wire.
///
/// Peers send either a JSON number or a numeric string. The received form is
/// kept so the canonical payload matches what the facilitator signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BpsValue {
    Number(u64),
    Text(String),
}

impl BpsValue {
    pub fn to_u256(&self) -> Result<U256, FeeQuoteError> {
        match self {
            BpsValue::Number(n) => Ok(U256::from(*n)),
            BpsValue::Text(s) => parse_amount("bps", s),
        }
    }
}

impl From<u64> for BpsValue {
    fn from(n: u64) -> Self {
        BpsValue::Number(n)
    }
}

impl fmt::Display for BpsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BpsValue::Number(n) => write!(f, "{n}"),
            BpsValue::Text(s) => f.write_str(s),
        }
    }
}

/// A facilitator's declared pricing terms for settling a payment.
///
/// Immutable once signed: [`crate::sign_quote`] returns a new value instead
/// of mutating its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeeQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
    pub facilitator_address: String,
    pub model: FeeModel,
    pub asset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bps: Option<BpsValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<String>,
    /// Unix timestamp (seconds) after which the quote is stale.
    pub expiry: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_scheme: Option<SignatureScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_digest: Option<String>,
}

impl FeeQuote {
    /// Unsigned flat-fee quote.
    pub fn flat(
        facilitator_address: impl Into<String>,
        asset: impl Into<String>,
        flat_fee: impl Into<String>,
        expiry: u64,
    ) -> Self {
        Self {
            flat_fee: Some(flat_fee.into()),
            ..Self::empty(facilitator_address, FeeModel::Flat, asset, expiry)
        }
    }

    /// Unsigned basis-point quote without bounds.
    pub fn bps(
        facilitator_address: impl Into<String>,
        asset: impl Into<String>,
        bps: u64,
        expiry: u64,
    ) -> Self {
        Self {
            bps: Some(BpsValue::Number(bps)),
            ..Self::empty(facilitator_address, FeeModel::Bps, asset, expiry)
        }
    }

    fn empty(
        facilitator_address: impl Into<String>,
        model: FeeModel,
        asset: impl Into<String>,
        expiry: u64,
    ) -> Self {
        Self {
            quote_id: None,
            facilitator_address: facilitator_address.into(),
            model,
            asset: asset.into(),
            flat_fee: None,
            bps: None,
            min_fee: None,
            max_fee: None,
            expiry,
            signature: None,
            signature_scheme: None,
            quote_digest: None,
        }
    }

    /// Set the min/max bounds applied to a bps-computed fee.
    pub fn with_bounds(mut self, min_fee: Option<&str>, max_fee: Option<&str>) -> Self {
        self.min_fee = min_fee.map(String::from);
        self.max_fee = max_fee.map(String::from);
        self
    }

    pub fn with_quote_id(mut self, quote_id: impl Into<String>) -> Self {
        self.quote_id = Some(quote_id.into());
        self
    }

    /// Parse and validate a quote from JSON text.
    pub fn from_json(json: &str) -> Result<Self, FeeQuoteError> {
        let quote: FeeQuote = serde_json::from_str(json)
            .map_err(|e| FeeQuoteError::MalformedQuote(e.to_string()))?;
        quote.validate()?;
        Ok(quote)
    }

    /// Parse and validate a quote from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, FeeQuoteError> {
        let quote: FeeQuote = serde_json::from_value(value)
            .map_err(|e| FeeQuoteError::MalformedQuote(e.to_string()))?;
        quote.validate()?;
        Ok(quote)
    }

    pub fn to_json_pretty(&self) -> Result<String, FeeQuoteError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check field formats and that the fee fields agree with `model`.
    ///
    /// Format problems are [`FeeQuoteError::MalformedQuote`]; a model whose
    /// required field is missing, or that carries another model's field, is
    /// [`FeeQuoteError::InvalidFeeModel`].
    pub fn validate(&self) -> Result<(), FeeQuoteError> {
        if self.facilitator_address.trim().is_empty() {
            return Err(FeeQuoteError::MalformedQuote(
                "facilitatorAddress must not be empty".to_string(),
            ));
        }
        if self.asset.trim().is_empty() {
            return Err(FeeQuoteError::MalformedQuote(
                "asset must not be empty".to_string(),
            ));
        }

        if let Some(flat_fee) = &self.flat_fee {
            validate_amount("flatFee", flat_fee)?;
        }
        if let Some(min_fee) = &self.min_fee {
            validate_amount("minFee", min_fee)?;
        }
        if let Some(max_fee) = &self.max_fee {
            validate_amount("maxFee", max_fee)?;
        }
        if let Some(bps) = &self.bps {
            bps.to_u256()?;
        }

        match self.model {
            FeeModel::Flat => {
                if self.flat_fee.is_none() {
                    return Err(FeeQuoteError::InvalidFeeModel(
                        "flat quote requires flatFee".to_string(),
                    ));
                }
                if self.bps.is_some() || self.min_fee.is_some() || self.max_fee.is_some() {
                    return Err(FeeQuoteError::InvalidFeeModel(
                        "flat quote must not carry bps, minFee or maxFee".to_string(),
                    ));
                }
            }
            FeeModel::Bps => {
                if self.bps.is_none() {
                    return Err(FeeQuoteError::InvalidFeeModel(
                        "bps quote requires bps".to_string(),
                    ));
                }
                if self.flat_fee.is_some() {
                    return Err(FeeQuoteError::InvalidFeeModel(
                        "bps quote must not carry flatFee".to_string(),
                    ));
                }
            }
            FeeModel::Tiered | FeeModel::Hybrid => {}
        }

        Ok(())
    }

    /// True once the quote carries a signature.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}
