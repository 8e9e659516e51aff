//! JSON Schemas for the `facilitatorFees` extension payloads.

use serde_json::{json, Value};

use crate::constants::JSON_SCHEMA_DIALECT;

fn fee_quote_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "quoteId": {"type": "string"},
            "facilitatorAddress": {"type": "string"},
            "model": {"type": "string", "enum": ["flat", "bps", "tiered", "hybrid"]},
            "asset": {"type": "string"},
            "flatFee": {"type": "string", "pattern": "^[0-9]+$"},
            "bps": {
                "oneOf": [
                    {"type": "integer", "minimum": 0},
                    {"type": "string", "pattern": "^[0-9]+$"}
                ]
            },
            "minFee": {"type": "string", "pattern": "^[0-9]+$"},
            "maxFee": {"type": "string", "pattern": "^[0-9]+$"},
            "expiry": {"type": "integer", "minimum": 0},
            "signature": {"type": "string"},
            "signatureScheme": {"type": "string", "enum": ["eip191", "ed25519"]},
            "quoteDigest": {"type": "string"}
        },
        "required": ["facilitatorAddress", "model", "asset", "expiry"],
        "allOf": [
            {
                "if": {"properties": {"model": {"const": "flat"}}},
                "then": {"required": ["flatFee"]}
            },
            {
                "if": {"properties": {"model": {"const": "bps"}}},
                "then": {"required": ["bps"]}
            }
        ]
    })
}

fn facilitator_option_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "facilitatorId": {"type": "string", "format": "uri"},
            "facilitatorFeeQuote": fee_quote_schema(),
            "facilitatorFeeQuoteRef": {"type": "string", "format": "uri"},
            "maxFacilitatorFee": {"type": "string"}
        },
        "required": ["facilitatorId"]
    })
}

/// Schema for the `info` object carried in `PaymentRequired`.
pub fn payment_required_schema() -> Value {
    json!({
        "$schema": JSON_SCHEMA_DIALECT,
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "version": {"type": "string"},
            "options": {
                "type": "array",
                "items": facilitator_option_schema()
            }
        },
        "required": ["version", "options"]
    })
}

/// Schema for the `info` object carried in `PaymentPayload`.
pub fn payment_payload_schema() -> Value {
    json!({
        "$schema": JSON_SCHEMA_DIALECT,
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "version": {"type": "string"},
            "facilitatorFeeBid": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "maxTotalFee": {"type": "string"},
                    "asset": {"type": "string"},
                    "selectedQuoteId": {"type": "string"}
                },
                "required": ["maxTotalFee", "asset"]
            }
        },
        "required": ["version", "facilitatorFeeBid"]
    })
}

/// Schema for the `info` object carried in `SettlementResponse`.
pub fn settlement_response_schema() -> Value {
    json!({
        "$schema": JSON_SCHEMA_DIALECT,
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "version": {"type": "string"},
            "facilitatorFeePaid": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "facilitatorFeePaid": {"type": "string"},
                    "asset": {"type": "string"},
                    "quoteId": {"type": "string"},
                    "facilitatorId": {"type": "string", "format": "uri"},
                    "model": {"type": "string", "enum": ["flat", "bps", "tiered", "hybrid"]}
                },
                "required": ["facilitatorFeePaid", "asset"]
            }
        },
        "required": ["version", "facilitatorFeePaid"]
    })
}

/// All three schemas keyed by message.
pub fn schema_bundle() -> Value {
    json!({
        "paymentRequired": payment_required_schema(),
        "paymentPayload": payment_payload_schema(),
        "settlementResponse": settlement_response_schema(),
    })
}
