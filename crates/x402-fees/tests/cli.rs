//! Drive the quote tools the way a facilitator operator would.

#![cfg(feature = "full")]

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use x402_fees::{Ed25519QuoteSigner, Eip191QuoteSigner, QuoteSigner};

const EXPIRY: u64 = 1_900_000_000;

fn tool(bin: &str, dir: &Path) -> Command {
    let mut cmd = Command::new(bin);
    cmd.current_dir(dir)
        .env_remove("FACILITATOR_PRIVATE_KEY")
        .env_remove("FACILITATOR_PUBLIC_KEY")
        .env_remove("QUOTE_SIGNATURE_SCHEME")
        .env("RUST_LOG", "warn");
    cmd
}

fn sign_tool(dir: &Path) -> Command {
    tool(env!("CARGO_BIN_EXE_x402-sign-quote"), dir)
}

fn verify_tool(dir: &Path) -> Command {
    tool(env!("CARGO_BIN_EXE_x402-verify-quote"), dir)
}

fn write_quote(dir: &Path, address: &str) -> std::path::PathBuf {
    let path = dir.join("quote.json");
    let quote = json!({
        "quoteId": "quote_abc123",
        "facilitatorAddress": address,
        "model": "bps",
        "asset": "0xfee",
        "bps": 250,
        "minFee": "100",
        "maxFee": "5000",
        "expiry": EXPIRY
    });
    std::fs::write(&path, serde_json::to_string_pretty(&quote).unwrap()).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_sign_then_verify_ed25519() {
    let dir = tempfile::tempdir().unwrap();
    let secret = "07".repeat(32);
    let public = Ed25519QuoteSigner::from_hex(&secret)
        .unwrap()
        .verifying_key_hex();
    write_quote(dir.path(), "facilitator-1");

    let out = sign_tool(dir.path())
        .args(["--input", "quote.json", "--output", "out/quote.signed.json"])
        .args(["--private-key", &secret, "--scheme", "ed25519"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let signed: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("out/quote.signed.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(signed["signatureScheme"], "ed25519");
    assert!(signed["signature"].as_str().unwrap().starts_with("0x"));
    assert_eq!(signed["quoteId"], "quote_abc123");

    let out = verify_tool(dir.path())
        .args(["--input", "out/quote.signed.json", "--public-key", &public])
        .args(["--now", &EXPIRY.to_string()])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("Signature valid"));

    let out = verify_tool(dir.path())
        .args(["--input", "out/quote.signed.json", "--public-key", &public])
        .args(["--now", &(EXPIRY + 1).to_string()])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("expired"));
}

#[test]
fn test_sign_then_verify_eip191_with_env_keys() {
    let dir = tempfile::tempdir().unwrap();
    let secret = format!("0x{}", "07".repeat(32));
    let address = Eip191QuoteSigner::from_hex(&secret).unwrap().signer_id();
    write_quote(dir.path(), &address);

    let key_file = dir.path().join("facilitator.key");
    std::fs::write(&key_file, format!("{secret}\n")).unwrap();

    let out = sign_tool(dir.path())
        .args(["--input", "quote.json", "--output", "quote.signed.json"])
        .env("FACILITATOR_PRIVATE_KEY", key_file.to_str().unwrap())
        .env("QUOTE_SIGNATURE_SCHEME", "eip191")
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let out = verify_tool(dir.path())
        .args(["--input", "quote.signed.json", "--now", "0"])
        .env("FACILITATOR_PUBLIC_KEY", address.to_lowercase())
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));
}

#[test]
fn test_tampered_quote_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let secret = "09".repeat(32);
    let public = Ed25519QuoteSigner::from_hex(&secret)
        .unwrap()
        .verifying_key_hex();
    write_quote(dir.path(), "facilitator-1");

    let out = sign_tool(dir.path())
        .args(["--input", "quote.json", "--output", "signed.json"])
        .args(["--private-key", &secret])
        .output()
        .unwrap();
    assert!(out.status.success());

    let path = dir.path().join("signed.json");
    let mut signed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    signed["maxFee"] = json!("50000");
    std::fs::write(&path, signed.to_string()).unwrap();

    let out = verify_tool(dir.path())
        .args(["--input", "signed.json", "--public-key", &public, "--now", "0"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("signature mismatch"));
}

#[test]
fn test_unsupported_scheme_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quote.json");
    let quote = json!({
        "facilitatorAddress": "0xabc",
        "model": "flat",
        "asset": "0xfee",
        "flatFee": "1000",
        "expiry": EXPIRY,
        "signature": "0x00",
        "signatureScheme": "rsa"
    });
    std::fs::write(&path, quote.to_string()).unwrap();

    let out = verify_tool(dir.path())
        .args(["--input", "quote.json", "--public-key", "0xabc", "--now", "0"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unsupported signature scheme"));
}

#[test]
fn test_missing_arguments_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    write_quote(dir.path(), "facilitator-1");

    // no --output
    let out = sign_tool(dir.path())
        .args(["--input", "quote.json", "--private-key", &"07".repeat(32)])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));

    // no key anywhere
    let out = sign_tool(dir.path())
        .args(["--input", "quote.json", "--output", "signed.json"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("FACILITATOR_PRIVATE_KEY"));
    assert!(!dir.path().join("signed.json").exists());

    let out = verify_tool(dir.path())
        .args(["--input", "quote.json"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_digest_tool_prints_canonical_json() {
    let dir = tempfile::tempdir().unwrap();
    write_quote(dir.path(), "0xabc");

    let out = tool(env!("CARGO_BIN_EXE_x402-quote-digest"), dir.path())
        .args(["--input", "quote.json", "--output-json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let report: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["signatureScheme"], "eip191");
    assert_eq!(
        report["canonicalJson"],
        r#"{"asset":"0xfee","bps":250,"expiry":1900000000,"maxFee":"5000","minFee":"100","model":"bps"}"#
    );
    assert_eq!(report["digest"].as_str().unwrap().len(), 66);
}

#[test]
fn test_schema_tool_targets() {
    let dir = tempfile::tempdir().unwrap();
    let out = tool(env!("CARGO_BIN_EXE_x402-fee-schema"), dir.path())
        .args(["--target", "payment-payload"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let schema: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert!(schema["properties"]["facilitatorFeeBid"].is_object());
}

#[test]
fn test_schema_tool_unknown_target_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = tool(env!("CARGO_BIN_EXE_x402-fee-schema"), dir.path())
        .args(["--target", "settlement"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
}
