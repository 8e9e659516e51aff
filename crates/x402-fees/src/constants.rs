/// Key under which the fee extension lives in x402 `extensions` maps.
pub const FACILITATOR_FEES: &str = "facilitatorFees";

/// Version string written into every extension `info` object.
pub const EXTENSION_VERSION: &str = "1";

/// One basis point is 1/10000 of the payment amount.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Quote fields that never enter the signing payload.
///
/// Shared by the signer and the verifier so both hash identical bytes.
pub const EXCLUDED_QUOTE_FIELDS: [&str; 5] = [
    "quoteId",
    "facilitatorAddress",
    "signature",
    "signatureScheme",
    "quoteDigest",
];

/// JSON Schema dialect used by the published extension schemas.
pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Wire name of the EIP-191 scheme.
pub const SCHEME_EIP191: &str = "eip191";

/// Wire name of the Ed25519 scheme.
pub const SCHEME_ED25519: &str = "ed25519";
