//! Facilitator fee quotes for the x402 payment protocol.
//!
//! A facilitator settles payments on behalf of a resource server and
//! discloses what it will charge through a signed, time-bounded
//! [`FeeQuote`]. This crate computes the fee a quote implies, derives the
//! canonical payload that gets signed, and signs/verifies quotes under
//! EIP-191 (secp256k1) or Ed25519.
//!
//! # Lifecycle
//!
//! - **Facilitator**: builds a quote and signs it with a [`QuoteSigner`]
//! - **Resource server**: embeds quotes in `PaymentRequired` via the
//!   [`extension`] helpers
//! - **Verifier**: checks freshness and signature with [`verify_quote`]
//!
//! # Quick example
//!
//! ```
//! use x402_fees::{compute_bps_fee, FeeQuote};
//!
//! let quote = FeeQuote::bps("0xabc0000000000000000000000000000000000001", "0xfee", 250, 1_900_000_000)
//!     .with_bounds(Some("100"), Some("5000"));
//!
//! assert_eq!(compute_bps_fee(&quote, "1000000").unwrap(), "5000");
//! assert_eq!(compute_bps_fee(&quote, "1000").unwrap(), "100");
//! ```

// Core types
pub mod amount;
pub mod constants;
pub mod error;
pub mod quote;

// Fee computation and signing payloads
pub mod canonical;
pub mod fee;

// Signature schemes
pub mod ed25519;
pub mod eip191;
pub mod signer;
pub mod verify;

// x402 extension objects
pub mod extension;
pub mod schema;

// Key material and CLI wiring
pub mod config;

// Re-exports
pub use canonical::{canonicalize_for_signing, SigningPayload};
pub use constants::*;
pub use error::FeeQuoteError;
pub use fee::{calculate_fee, compute_bps_fee};
pub use quote::{BpsValue, FeeModel, FeeQuote, SignatureScheme};
pub use signer::{sign_quote, QuoteSigner};
pub use verify::{is_quote_expired, unix_now, verify_quote, verify_quote_now};

pub use ed25519::Ed25519QuoteSigner;
pub use eip191::Eip191QuoteSigner;
