//! Print JSON Schemas for the facilitatorFees extension.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use x402_fees::schema;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    PaymentRequired,
    PaymentPayload,
    SettlementResponse,
    Bundle,
}

#[derive(Debug, Parser)]
#[command(
    name = "x402-fee-schema",
    about = "Emit JSON Schemas for the x402 facilitatorFees extension"
)]
struct Args {
    /// Which schema to output.
    #[arg(long, value_enum, default_value_t = Target::Bundle)]
    target: Target,
}

fn run(args: Args) -> Result<(), serde_json::Error> {
    let schema = match args.target {
        Target::PaymentRequired => schema::payment_required_schema(),
        Target::PaymentPayload => schema::payment_payload_schema(),
        Target::SettlementResponse => schema::settlement_response_schema(),
        Target::Bundle => schema::schema_bundle(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn main() -> ExitCode {
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
