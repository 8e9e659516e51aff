//! Fee computation.
//!
//! All arithmetic is 256-bit unsigned integer math. Division truncates, so a
//! bps fee never carries a fractional remainder.

use alloy::primitives::U256;

use crate::amount::parse_amount;
use crate::constants::BPS_DENOMINATOR;
use crate::quote::{FeeModel, FeeQuote};
use crate::FeeQuoteError;

/// Fee for `payment_amount` under the quote's basis-point rate.
///
/// `floor(amount * bps / 10000)`, raised to `minFee` when set, then lowered
/// to `maxFee` when set. The max clamp runs last, so it wins when a caller
/// configures `minFee > maxFee`.
///
/// Fails with [`FeeQuoteError::InvalidFeeModel`] when `bps` is absent or zero.
pub fn compute_bps_fee(quote: &FeeQuote, payment_amount: &str) -> Result<String, FeeQuoteError> {
    let bps = match &quote.bps {
        Some(bps) => bps.to_u256()?,
        None => {
            return Err(FeeQuoteError::InvalidFeeModel(
                "bps is required for bps fee calculation".to_string(),
            ))
        }
    };
    if bps.is_zero() {
        return Err(FeeQuoteError::InvalidFeeModel(
            "bps must be greater than zero".to_string(),
        ));
    }

    let amount = parse_amount("paymentAmount", payment_amount)?;
    let raw = amount.checked_mul(bps).ok_or_else(|| {
        FeeQuoteError::MalformedQuote(format!(
            "paymentAmount '{payment_amount}' times bps overflows"
        ))
    })? / U256::from(BPS_DENOMINATOR);

    let mut fee = raw;
    if let Some(min_fee) = &quote.min_fee {
        let min = parse_amount("minFee", min_fee)?;
        if fee < min {
            fee = min;
        }
    }
    if let Some(max_fee) = &quote.max_fee {
        let max = parse_amount("maxFee", max_fee)?;
        if fee > max {
            fee = max;
        }
    }

    if fee != raw {
        tracing::debug!(%raw, %fee, "bps fee clamped to quote bounds");
    }

    Ok(fee.to_string())
}

/// Fee for `payment_amount` under whatever model the quote declares.
///
/// `flat` returns `flatFee` unchanged, `bps` defers to [`compute_bps_fee`].
/// `tiered` and `hybrid` carry no pricing rule on the wire and fail with
/// [`FeeQuoteError::InvalidFeeModel`].
pub fn calculate_fee(quote: &FeeQuote, payment_amount: &str) -> Result<String, FeeQuoteError> {
    match quote.model {
        FeeModel::Flat => {
            let flat_fee = quote.flat_fee.as_deref().ok_or_else(|| {
                FeeQuoteError::InvalidFeeModel("flat quote requires flatFee".to_string())
            })?;
            parse_amount("paymentAmount", payment_amount)?;
            Ok(parse_amount("flatFee", flat_fee)?.to_string())
        }
        FeeModel::Bps => compute_bps_fee(quote, payment_amount),
        model @ (FeeModel::Tiered | FeeModel::Hybrid) => Err(FeeQuoteError::InvalidFeeModel(
            format!("fee calculation is not defined for the {model} model"),
        )),
    }
}
