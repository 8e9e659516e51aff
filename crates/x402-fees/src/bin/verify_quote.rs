//! Verify a signed facilitator fee quote.
//!
//! Exits 0 and prints `Signature valid` when the quote is fresh and signed
//! by the given key; exits 1 with the reason otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use x402_fees::config::{init_tracing, resolve_key_material, QuoteToolConfig};
use x402_fees::{unix_now, verify_quote, FeeQuote, FeeQuoteError};

#[derive(Debug, Parser)]
#[command(name = "x402-verify-quote", about = "Verify an x402 facilitator fee quote")]
struct Args {
    /// Signed quote JSON.
    #[arg(long, value_name = "PATH", default_value = "quote.signed.json")]
    input: PathBuf,
    /// Expected signer: ed25519 public key (SPKI PEM or hex) or eip191
    /// address, inline or in a file. Falls back to FACILITATOR_PUBLIC_KEY.
    #[arg(long = "public-key", value_name = "KEY")]
    public_key: Option<String>,
    /// Evaluate expiry at this Unix time instead of the system clock.
    #[arg(long, value_name = "SECS")]
    now: Option<u64>,
}

fn run(args: Args) -> Result<(), FeeQuoteError> {
    let config = QuoteToolConfig::from_env();
    let key = args.public_key.or(config.public_key).ok_or_else(|| {
        FeeQuoteError::InvalidKey(
            "missing public key -- set FACILITATOR_PUBLIC_KEY or pass --public-key".to_string(),
        )
    })?;
    let expected = resolve_key_material(&key)?;

    let quote = FeeQuote::from_json(&std::fs::read_to_string(&args.input)?)?;
    let now = args.now.unwrap_or_else(unix_now);
    verify_quote(&quote, &expected, now)
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args) {
        Ok(()) => {
            println!("Signature valid");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
