//! Sign a facilitator fee quote.
//!
//! Reads a quote JSON file, canonicalizes it, digests and signs it, and
//! writes the quote back out with `signature`, `signatureScheme` and
//! `quoteDigest` populated.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use x402_fees::config::{init_tracing, resolve_key_material, signer_from_key, QuoteToolConfig};
use x402_fees::{sign_quote, FeeQuote, FeeQuoteError, SignatureScheme};

#[derive(Debug, Parser)]
#[command(name = "x402-sign-quote", about = "Sign an x402 facilitator fee quote")]
struct Args {
    /// Unsigned quote JSON.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Where to write the signed quote.
    #[arg(long, value_name = "PATH")]
    output: PathBuf,
    /// Signing key: PEM, hex, or a file holding either. Falls back to
    /// FACILITATOR_PRIVATE_KEY.
    #[arg(long = "private-key", value_name = "KEY")]
    private_key: Option<String>,
    /// Signature scheme. Falls back to QUOTE_SIGNATURE_SCHEME, then ed25519.
    #[arg(long, value_name = "SCHEME")]
    scheme: Option<SignatureScheme>,
}

fn run(args: Args) -> Result<(), FeeQuoteError> {
    let config = QuoteToolConfig::from_env();
    let key = args.private_key.or(config.private_key).ok_or_else(|| {
        FeeQuoteError::InvalidKey(
            "missing private key -- set FACILITATOR_PRIVATE_KEY or pass --private-key".to_string(),
        )
    })?;
    let scheme = args.scheme.unwrap_or(config.scheme);

    let signer = signer_from_key(&scheme, &resolve_key_material(&key)?)?;
    let quote = FeeQuote::from_json(&std::fs::read_to_string(&args.input)?)?;
    let signed = sign_quote(&quote, signer.as_ref())?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.output, format!("{}\n", signed.to_json_pretty()?))?;

    tracing::info!(output = %args.output.display(), %scheme, "signed quote written");
    println!("[+] Signed quote written to: {}", args.output.display());
    println!("    signer          = {}", signer.signer_id());
    println!("    signatureScheme = {scheme}");
    println!(
        "    quoteDigest     = {}",
        signed.quote_digest.as_deref().unwrap_or_default()
    );
    Ok(())
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
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
