use chrono::{TimeZone, Utc};
use eos_trx_analyzer::analyzer::{Analyzer, AnalyzerConfig};
use eos_trx_analyzer::codec::{self, ByteWriter};
use eos_trx_analyzer::errors::AnalyzerError;
use eos_trx_analyzer::models::abi::Abi;
use eos_trx_analyzer::models::system::{SetAbi, SetCode, EOSIO, SETABI, SETCODE};
use eos_trx_analyzer::models::{
    Action, CompressionType, KeyType, Name, PackedTransaction, PermissionLevel, Signature,
    SignedTransaction, Transaction,
};
use eos_trx_analyzer::utils::hash::sha256_hex;
use eos_trx_analyzer::{analyze_bytes, analyze_packed_transaction};
use std::io::Write;
use tempfile::NamedTempFile;

fn name(s: &str) -> Name {
    s.parse().unwrap()
}

fn config(verbose: bool) -> AnalyzerConfig {
    AnalyzerConfig {
        verbose,
        now: Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
    }
}

fn active(actor: &str) -> Vec<PermissionLevel> {
    vec![PermissionLevel::new(name(actor), name("active"))]
}

/// ABI of a small guestbook contract: 2 structs, 1 action, 0 tables
fn guestbook_abi() -> Abi {
    let mut abi = Abi::new("eosio::abi/1.1");
    abi.add_struct("entry", "", &[("author", "name"), ("message", "string")]);
    abi.add_struct("sign", "", &[("entry", "entry"), ("rating", "uint8")]);
    abi.add_action(name("sign"), "sign");
    abi
}

fn sign_payload(author: &str, message: &str, rating: u8) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    writer.write_u64(name(author).value());
    writer.write_string(message);
    writer.write_u8(rating);
    writer.into_inner()
}

fn deploy_transaction(code: &[u8]) -> SignedTransaction {
    let setcode = SetCode {
        account: name("guestbook"),
        vm_type: 0,
        vm_version: 0,
        code: code.to_vec(),
    };
    let setabi = SetAbi {
        account: name("guestbook"),
        abi: codec::to_bytes(&guestbook_abi()),
    };
    let transaction = Transaction {
        expiration: 1_700_000_060,
        ref_block_num: 1234,
        ref_block_prefix: 0x0a0b0c0d,
        actions: vec![
            Action::new(EOSIO, SETCODE, active("guestbook"), codec::to_bytes(&setcode)),
            Action::new(EOSIO, SETABI, active("guestbook"), codec::to_bytes(&setabi)),
            Action::new(
                name("guestbook"),
                name("sign"),
                active("alice"),
                sign_payload("alice", "was here", 5),
            ),
            Action::new(name("mystery"), name("poke"), active("alice"), vec![0xde, 0xad]),
        ],
        ..Default::default()
    };
    SignedTransaction {
        transaction,
        signatures: vec![Signature {
            key_type: KeyType::K1,
            data: vec![0x11; 65],
        }],
        context_free_data: vec![b"context".to_vec()],
    }
}

#[test]
fn test_deploy_then_call_end_to_end() {
    let code = b"\0asm contract built for SYS".to_vec();
    let packed = PackedTransaction::from_signed(&deploy_transaction(&code), CompressionType::Zlib).unwrap();
    let report = Analyzer::with_config(config(false)).analyze_packed(&packed);
    let text = &report.text;

    assert!(report.fatal.is_none());

    // Sections appear in order
    let packed_at = text.find(" PACKED TRANSACTION ").unwrap();
    let signed_at = text.find(" SIGNED TRANSACTION ").unwrap();
    let header_at = text.find(" TRANSACTION HEADER ").unwrap();
    let actions_at = text.find(" ACTIONS ").unwrap();
    assert!(packed_at < signed_at && signed_at < header_at && header_at < actions_at);

    assert!(text.contains(&format!("Transaction ID: {}", packed.id().unwrap())));
    assert!(text.contains("Number of context-free data blobs (on Transaction): 1"));
    assert!(text.contains("1. Blob length: 7"));
    assert!(text.contains("(in 1m, analysis time: 2023-11-14T22:13:20 UTC)"));
    assert!(text.contains("Reference block prefix: a0b0c0d"));
    assert!(text.contains("Actions: 4"));

    // setcode
    assert!(text.contains("1. Action eosio::setcode, authorized by: guestbook@active"));
    assert!(text.contains(&format!("Code's SHA256: {}", sha256_hex(&code))));
    assert!(text.contains("Contains the string 'SYS': true"));
    assert!(text.contains("Contains the string 'EOS': false"));

    // setabi installs the schema used by the next action
    assert!(text.contains("Set ABI for account: guestbook"));
    assert!(text.contains("2 structs"));
    assert!(text.contains("1 action,"));
    assert!(text.contains("0 tables"));
    assert!(text.contains("Data decoded as `sign` (installed ABI of guestbook):"));
    assert!(text.contains("  entry:\n    author: alice\n    message: \"was here\"\n  rating: 5"));

    // unknown account stays opaque
    assert!(text.contains(&format!(
        "No schema known for this action; data: 2 bytes, SHA256: {}",
        sha256_hex(&[0xde, 0xad])
    )));

    // quiet mode carries no dumps or JSON
    assert!(!text.contains("JSON representation of the ABI"));
    assert!(!text.contains("00000000  "));
}

#[test]
fn test_verbose_mode_adds_dumps() {
    let packed = PackedTransaction::from_signed(&deploy_transaction(b"EOS"), CompressionType::None).unwrap();
    let text = analyze_packed_transaction(&packed, true).text;
    assert!(text.contains("JSON representation of the ABI:"));
    assert!(text.contains("|context|"));
    assert!(text.contains("00000000  "));
}

#[test]
fn test_truncated_payload_keeps_going() {
    let mut payload = sign_payload("bob", "hello", 1);
    payload.truncate(10);
    let mut signed = deploy_transaction(b"");
    signed.transaction.actions[2].data = payload;
    let packed = PackedTransaction::from_signed(&signed, CompressionType::None).unwrap();

    let report = Analyzer::with_config(config(false)).analyze_packed(&packed);
    assert!(report.fatal.is_none());
    assert!(report.text.contains("Could not decode the data as `sign` (decode error)"));
    assert!(report.text.contains("4. Action mystery::poke"));
}

#[test]
fn test_corrupt_envelope_is_fatal() {
    let packed = PackedTransaction::new(vec![], CompressionType::None, vec![], vec![0xff; 5]);
    let report = Analyzer::with_config(config(false)).analyze_packed(&packed);
    assert!(report.is_fatal());
    assert!(matches!(report.fatal, Some(AnalyzerError::Unpack { .. })));
    assert!(report.text.contains("Could not unpack the transaction"));
    assert!(!report.text.contains(" ACTIONS "));
}

#[test]
fn test_file_inputs_in_every_form() {
    let packed = PackedTransaction::from_signed(&deploy_transaction(b"SYS"), CompressionType::Zlib).unwrap();
    let binary = codec::to_bytes(&packed);
    let json = serde_json::json!({
        "signatures": [],
        "compression": "zlib",
        "packed_context_free_data": hex::encode(&packed.packed_context_free_data),
        "packed_trx": hex::encode(&packed.packed_trx),
    })
    .to_string();

    let forms: Vec<Vec<u8>> = vec![
        binary.clone(),
        hex::encode(&binary).into_bytes(),
        base64::encode(&binary).into_bytes(),
        json.into_bytes(),
    ];
    for form in forms {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&form).unwrap();
        let data = std::fs::read(file.path()).unwrap();

        let report = analyze_bytes(&data, config(false)).unwrap();
        assert!(report.fatal.is_none());
        assert!(report.text.contains(&format!("Transaction ID: {}", packed.id().unwrap())));
        assert!(report.text.contains("Data decoded as `sign`"));
    }
}

#[test]
fn test_unrecognised_input_is_an_error() {
    let err = analyze_bytes(b"\x07\x07\x07", config(false)).unwrap_err();
    assert!(matches!(err, AnalyzerError::InputParsing(_)));
}
