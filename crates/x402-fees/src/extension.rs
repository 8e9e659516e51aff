//! The `facilitatorFees` x402 extension.
//!
//! Fee information rides in the `extensions` map of three protocol messages:
//!
//! - `PaymentRequired`: the server lists facilitator options and their quotes
//! - `PaymentPayload`: the client bids a maximum total fee
//! - `SettlementResponse`: the facilitator reports the fee actually charged
//!
//! Constructors validate before wrapping; extractors return `None` for
//! anything absent or invalid.

use alloy::primitives::U256;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::amount::{parse_amount, validate_amount};
use crate::constants::{EXTENSION_VERSION, FACILITATOR_FEES};
use crate::fee::calculate_fee;
use crate::quote::{FeeModel, FeeQuote};
use crate::schema::payment_required_schema;
use crate::FeeQuoteError;

/// One facilitator a resource server is willing to route through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitatorOption {
    /// Stable facilitator identifier; must be a URL.
    pub facilitator_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facilitator_fee_quote: Option<FeeQuote>,
    /// URL where the quote can be fetched instead of being inlined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facilitator_fee_quote_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_facilitator_fee: Option<String>,
}

impl FacilitatorOption {
    pub fn with_quote(facilitator_id: impl Into<String>, quote: FeeQuote) -> Self {
        Self {
            facilitator_id: facilitator_id.into(),
            facilitator_fee_quote: Some(quote),
            facilitator_fee_quote_ref: None,
            max_facilitator_fee: None,
        }
    }

    pub fn validate(&self) -> Result<(), FeeQuoteError> {
        validate_url("facilitatorId", &self.facilitator_id)?;
        if let Some(reference) = &self.facilitator_fee_quote_ref {
            validate_url("facilitatorFeeQuoteRef", reference)?;
        }
        if let Some(quote) = &self.facilitator_fee_quote {
            quote.validate()?;
        }
        if let Some(max_fee) = &self.max_facilitator_fee {
            validate_amount("maxFacilitatorFee", max_fee)?;
        }
        Ok(())
    }
}

/// Client-side fee constraint sent with the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitatorFeeBid {
    pub max_total_fee: String,
    pub asset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_quote_id: Option<String>,
}

impl FacilitatorFeeBid {
    pub fn validate(&self) -> Result<(), FeeQuoteError> {
        validate_amount("maxTotalFee", &self.max_total_fee)?;
        require_non_empty("asset", &self.asset)
    }
}

/// Fee a facilitator actually charged at settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitatorFeePaid {
    pub facilitator_fee_paid: String,
    pub asset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facilitator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<FeeModel>,
}

impl FacilitatorFeePaid {
    pub fn validate(&self) -> Result<(), FeeQuoteError> {
        validate_amount("facilitatorFeePaid", &self.facilitator_fee_paid)?;
        require_non_empty("asset", &self.asset)?;
        if let Some(id) = &self.facilitator_id {
            validate_url("facilitatorId", id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequiredInfo {
    pub version: String,
    pub options: Vec<FacilitatorOption>,
}

impl PaymentRequiredInfo {
    pub fn validate(&self) -> Result<(), FeeQuoteError> {
        self.options.iter().try_for_each(FacilitatorOption::validate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayloadInfo {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facilitator_fee_bid: Option<FacilitatorFeeBid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementInfo {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facilitator_fee_paid: Option<FacilitatorFeePaid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequiredExtension {
    pub info: PaymentRequiredInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPayloadExtension {
    pub info: PaymentPayloadInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementExtension {
    pub info: SettlementInfo,
}

fn validate_url(field: &str, value: &str) -> Result<(), FeeQuoteError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| FeeQuoteError::MalformedQuote(format!("{field} '{value}' is not a URL: {e}")))
}

fn require_non_empty(field: &str, value: &str) -> Result<(), FeeQuoteError> {
    if value.trim().is_empty() {
        return Err(FeeQuoteError::MalformedQuote(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

/// Build the `PaymentRequired` extension for a set of facilitator options.
pub fn declare_facilitator_fees_extension(
    options: Vec<FacilitatorOption>,
) -> Result<PaymentRequiredExtension, FeeQuoteError> {
    let info = PaymentRequiredInfo {
        version: EXTENSION_VERSION.to_string(),
        options,
    };
    info.validate()?;
    Ok(PaymentRequiredExtension {
        info,
        schema: Some(payment_required_schema()),
    })
}

/// Build the `PaymentPayload` extension carrying a client fee bid.
pub fn create_facilitator_fee_bid(
    bid: FacilitatorFeeBid,
) -> Result<PaymentPayloadExtension, FeeQuoteError> {
    bid.validate()?;
    Ok(PaymentPayloadExtension {
        info: PaymentPayloadInfo {
            version: EXTENSION_VERSION.to_string(),
            facilitator_fee_bid: Some(bid),
        },
    })
}

/// Build the `SettlementResponse` extension reporting the fee charged.
pub fn create_facilitator_fee_paid(
    paid: FacilitatorFeePaid,
) -> Result<SettlementExtension, FeeQuoteError> {
    paid.validate()?;
    Ok(SettlementExtension {
        info: SettlementInfo {
            version: EXTENSION_VERSION.to_string(),
            facilitator_fee_paid: Some(paid),
        },
    })
}

fn extract_info<T: DeserializeOwned>(extensions: &Map<String, Value>) -> Option<T> {
    let info = extensions.get(FACILITATOR_FEES)?.get("info")?;
    match serde_json::from_value(info.clone()) {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed facilitatorFees extension");
            None
        }
    }
}

/// Facilitator options from a `PaymentRequired` extensions map.
pub fn extract_facilitator_fees_from_payment_required(
    extensions: &Map<String, Value>,
) -> Option<PaymentRequiredInfo> {
    let info: PaymentRequiredInfo = extract_info(extensions)?;
    match info.validate() {
        Ok(()) => Some(info),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring invalid facilitator options");
            None
        }
    }
}

/// Client fee bid from a `PaymentPayload` extensions map.
pub fn extract_facilitator_fee_bid(extensions: &Map<String, Value>) -> Option<FacilitatorFeeBid> {
    let info: PaymentPayloadInfo = extract_info(extensions)?;
    info.facilitator_fee_bid.filter(|bid| bid.validate().is_ok())
}

/// Fee paid from a `SettlementResponse` extensions map.
pub fn extract_facilitator_fee_paid(
    extensions: &Map<String, Value>,
) -> Option<FacilitatorFeePaid> {
    let info: SettlementInfo = extract_info(extensions)?;
    info.facilitator_fee_paid.filter(|paid| paid.validate().is_ok())
}

pub fn find_option_by_quote_id<'a>(
    options: &'a [FacilitatorOption],
    quote_id: &str,
) -> Option<&'a FacilitatorOption> {
    options.iter().find(|option| {
        option
            .facilitator_fee_quote
            .as_ref()
            .and_then(|quote| quote.quote_id.as_deref())
            == Some(quote_id)
    })
}

/// Upper bound on what routing through `option` costs for `payment_amount`.
///
/// An inline quote with a computable fee wins; otherwise the declared
/// `maxFacilitatorFee`. `None` when neither gives a number.
pub fn option_fee_ceiling(option: &FacilitatorOption, payment_amount: &str) -> Option<U256> {
    let quoted = option
        .facilitator_fee_quote
        .as_ref()
        .and_then(|quote| calculate_fee(quote, payment_amount).ok())
        .and_then(|fee| parse_amount("fee", &fee).ok());
    quoted.or_else(|| {
        option
            .max_facilitator_fee
            .as_deref()
            .and_then(|max| parse_amount("maxFacilitatorFee", max).ok())
    })
}

/// Options whose fee for `payment_amount` is at most `max_fee`.
///
/// Options without a determinable fee are dropped.
pub fn filter_options_by_max_fee<'a>(
    options: &'a [FacilitatorOption],
    max_fee: &str,
    payment_amount: &str,
) -> Result<Vec<&'a FacilitatorOption>, FeeQuoteError> {
    let max = parse_amount("maxFee", max_fee)?;
    parse_amount("paymentAmount", payment_amount)?;
    Ok(options
        .iter()
        .filter(|option| {
            option_fee_ceiling(option, payment_amount).is_some_and(|fee| fee <= max)
        })
        .collect())
}

/// A bps quote must cap its fee before it can be compared for routing.
pub fn validate_bps_quote_has_max_fee(quote: &FeeQuote) -> Result<(), FeeQuoteError> {
    if quote.model == FeeModel::Bps && quote.max_fee.is_none() {
        return Err(FeeQuoteError::InvalidFeeModel(
            "bps quote must declare maxFee for fee routing".to_string(),
        ));
    }
    Ok(())
}

/// Whether `option` gives an amount-independent fee ceiling.
///
/// True for flat quotes, bps quotes with `maxFee`, and any option that
/// declares `maxFacilitatorFee`.
pub fn can_compare_for_fee_routing(option: &FacilitatorOption) -> bool {
    if option.max_facilitator_fee.is_some() {
        return true;
    }
    match &option.facilitator_fee_quote {
        Some(quote) => match quote.model {
            FeeModel::Flat => quote.flat_fee.is_some(),
            FeeModel::Bps => quote.bps.is_some() && quote.max_fee.is_some(),
            FeeModel::Tiered | FeeModel::Hybrid => false,
        },
        None => false,
    }
}

/// Check a settlement's reported fee against the client's bid.
///
/// The asset must match (case-insensitively), the charged fee must not
/// exceed `maxTotalFee`, and when both sides name a quote the ids must agree.
pub fn verify_settlement_matches_selection(
    bid: &FacilitatorFeeBid,
    paid: &FacilitatorFeePaid,
) -> Result<(), FeeQuoteError> {
    if !bid.asset.eq_ignore_ascii_case(&paid.asset) {
        return Err(FeeQuoteError::SettlementMismatch(format!(
            "asset {} differs from bid asset {}",
            paid.asset, bid.asset
        )));
    }

    if let (Some(selected), Some(settled)) = (&bid.selected_quote_id, &paid.quote_id) {
        if selected != settled {
            return Err(FeeQuoteError::SettlementMismatch(format!(
                "settled quote {settled} but client selected {selected}"
            )));
        }
    }

    let max = parse_amount("maxTotalFee", &bid.max_total_fee)?;
    let charged = parse_amount("facilitatorFeePaid", &paid.facilitator_fee_paid)?;
    if charged > max {
        return Err(FeeQuoteError::SettlementMismatch(format!(
            "charged {charged} exceeds maxTotalFee {max}"
        )));
    }
    Ok(())
}
