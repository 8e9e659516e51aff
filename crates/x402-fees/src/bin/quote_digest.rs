//! Print the canonical signing payload of a quote and its digest.

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use x402_fees::config::init_tracing;
use x402_fees::{canonicalize_for_signing, FeeQuote, FeeQuoteError, SignatureScheme};

#[derive(Debug, Parser)]
#[command(
    name = "x402-quote-digest",
    about = "Canonicalize an x402 fee quote and compute its signing digest"
)]
struct Args {
    /// Quote JSON path, or '-' for stdin.
    #[arg(long, value_name = "PATH", default_value = "-")]
    input: String,
    /// Scheme whose digest function to apply.
    #[arg(long, value_name = "SCHEME", default_value = "eip191")]
    scheme: SignatureScheme,
    /// Print the canonical JSON before the digest.
    #[arg(long)]
    print_canonical: bool,
    /// Emit a JSON object with the scheme, canonical JSON and digest.
    #[arg(long)]
    output_json: bool,
}

fn read_input(input: &str) -> Result<String, FeeQuoteError> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(input)?)
}

fn run(args: Args) -> Result<(), FeeQuoteError> {
    let quote = FeeQuote::from_json(&read_input(&args.input)?)?;
    let payload = canonicalize_for_signing(&quote)?;
    let digest = format!("0x{}", alloy::hex::encode(payload.digest(&args.scheme)?));

    if args.output_json {
        let out = serde_json::json!({
            "signatureScheme": args.scheme.as_str(),
            "canonicalJson": payload.as_str(),
            "digest": digest,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if args.print_canonical {
        println!("{}", payload.as_str());
    }
    println!("{digest}");
    Ok(())
}

fn main() -> ExitCode {
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
