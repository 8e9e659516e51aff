//! Decimal token amounts.
//!
//! Amounts travel as base-10 integer strings so they can exceed 2^53. They
//! are parsed into 256-bit unsigned integers; no floating point is involved.

use alloy::primitives::U256;

use crate::FeeQuoteError;

/// Parse a non-negative base-10 integer string into a [`U256`].
///
/// `field` names the value in error messages. Signs, whitespace, hex
/// prefixes, and fractional parts are rejected.
pub fn parse_amount(field: &str, value: &str) -> Result<U256, FeeQuoteError> {
    if value.is_empty() {
        return Err(FeeQuoteError::MalformedQuote(format!(
            "{field} must not be empty"
        )));
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FeeQuoteError::MalformedQuote(format!(
            "{field} must be a decimal integer string, got '{value}'"
        )));
    }
    U256::from_str_radix(value, 10)
        .map_err(|e| FeeQuoteError::MalformedQuote(format!("{field} '{value}': {e}")))
}

/// Check that `value` is a decimal integer string without keeping the result.
pub fn validate_amount(field: &str, value: &str) -> Result<(), FeeQuoteError> {
    parse_amount(field, value).map(|_| ())
}
