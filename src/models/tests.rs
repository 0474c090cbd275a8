#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::codec;
    use crate::errors::AnalyzerError;
    use crate::models::name::ParseNameError;
    use crate::utils::hash::sha256_hex;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    fn sample_transaction() -> Transaction {
        let auth = vec![PermissionLevel::new(name("alice"), name("active"))];
        Transaction {
            expiration: 1_600_000_000,
            ref_block_num: 7,
            ref_block_prefix: 99,
            max_net_usage_words: 300,
            max_cpu_usage_ms: 5,
            delay_sec: 0,
            context_free_actions: vec![Action::new(name("ctx"), name("note"), vec![], vec![0xaa])],
            actions: vec![
                Action::new(name("eosio.token"), name("transfer"), auth.clone(), vec![1, 2, 3]),
                Action::new(name("bob"), name("hi"), auth, vec![]),
            ],
            transaction_extensions: vec![Extension {
                kind: 1,
                data: vec![0xbe, 0xef],
            }],
        }
    }

    fn sample_signed() -> SignedTransaction {
        SignedTransaction {
            transaction: sample_transaction(),
            signatures: vec![Signature {
                key_type: KeyType::K1,
                data: vec![3u8; 65],
            }],
            context_free_data: vec![b"first".to_vec(), vec![]],
        }
    }

    #[test]
    fn test_name_round_trip() {
        for text in ["eosio", "eosio.token", "a", "zzzzzzzzzzzzj", "12345abcdefgh", ""] {
            let parsed = name(text);
            assert_eq!(parsed.to_string(), text);
        }
        assert_eq!(name("eosio").value(), 0x5530_EA00_0000_0000);
        assert_eq!(Name::new(0).to_string(), "");
        assert!(Name::default().is_empty());
    }

    #[test]
    fn test_name_rejects_invalid() {
        assert!(matches!("Alice".parse::<Name>(), Err(ParseNameError::InvalidChar { ch: 'A', .. })));
        assert!(matches!("abcdefghijklmn".parse::<Name>(), Err(ParseNameError::TooLong(_))));
        assert!(matches!("aaaaaaaaaaaaz".parse::<Name>(), Err(ParseNameError::InvalidLastChar(_))));
        assert!(matches!("bad6".parse::<Name>(), Err(ParseNameError::InvalidChar { ch: '6', .. })));
    }

    #[test]
    fn test_name_const_matches_parse() {
        assert_eq!(Name::from_literal("eosio.msig"), name("eosio.msig"));
        assert_eq!(crate::models::system::SETABI, name("setabi"));
    }

    #[test]
    fn test_transaction_codec() {
        let tx = sample_transaction();
        let bytes = codec::to_bytes(&tx);
        assert_eq!(codec::from_bytes::<Transaction>(&bytes).unwrap(), tx);
        assert_eq!(tx.expiration_time().timestamp(), 1_600_000_000);
    }

    #[test]
    fn test_zlib_unpacks_like_uncompressed() {
        let signed = sample_signed();
        let plain = PackedTransaction::from_signed(&signed, CompressionType::None).unwrap();
        let zlib = PackedTransaction::from_signed(&signed, CompressionType::Zlib).unwrap();

        assert_ne!(plain.packed_trx, zlib.packed_trx);
        assert_eq!(plain.unpack().unwrap(), zlib.unpack().unwrap());
        assert_eq!(zlib.unpack().unwrap(), &signed);
        assert_eq!(plain.id().unwrap(), zlib.id().unwrap());
    }

    #[test]
    fn test_id_is_hash_of_uncompressed_transaction() {
        let signed = sample_signed();
        let packed = PackedTransaction::from_signed(&signed, CompressionType::Zlib).unwrap();
        let expected = sha256_hex(&codec::to_bytes(&signed.transaction));
        assert_eq!(packed.id().unwrap(), expected);
    }

    #[test]
    fn test_unpack_is_memoized() {
        let packed = PackedTransaction::from_signed(&sample_signed(), CompressionType::None).unwrap();
        let first: *const SignedTransaction = packed.unpack().unwrap();
        let second: *const SignedTransaction = packed.unpack().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_packed_codec() {
        let packed = PackedTransaction::from_signed(&sample_signed(), CompressionType::Zlib).unwrap();
        let bytes = codec::to_bytes(&packed);
        assert_eq!(codec::from_bytes::<PackedTransaction>(&bytes).unwrap(), packed);
    }

    #[test]
    fn test_unknown_compression_rejected() {
        let mut bytes = codec::to_bytes(
            &PackedTransaction::from_signed(&sample_signed(), CompressionType::None).unwrap(),
        );
        // 1 signature: varuint count, type index, 65 bytes
        bytes[67] = 9;
        assert!(codec::from_bytes::<PackedTransaction>(&bytes).is_err());
    }

    #[test]
    fn test_bad_zlib_is_decompression_error() {
        let packed = PackedTransaction::new(vec![], CompressionType::Zlib, vec![], vec![1, 2, 3, 4]);
        assert!(matches!(packed.unpack(), Err(AnalyzerError::Decompression(_))));
        assert!(packed.id().is_err());
    }

    #[test]
    fn test_zlib_inflation_is_bounded() {
        let mut signed = sample_signed();
        signed.transaction.actions[1].data = vec![0u8; transaction::MAX_UNPACKED_SIZE + 1];

        let zlib = PackedTransaction::from_signed(&signed, CompressionType::Zlib).unwrap();
        assert!(zlib.packed_trx.len() < transaction::MAX_UNPACKED_SIZE);
        match zlib.unpack() {
            Err(AnalyzerError::Decompression(msg)) => assert!(msg.contains("exceeds 1048576 bytes")),
            other => panic!("expected a decompression error, got {:?}", other),
        }

        let plain = PackedTransaction::from_signed(&signed, CompressionType::None).unwrap();
        assert_eq!(plain.unpack().unwrap(), &signed);
    }

    #[test]
    fn test_display_forms() {
        let level = PermissionLevel::new(name("alice"), name("owner"));
        assert_eq!(level.to_string(), "alice@owner");
        let sig = Signature {
            key_type: KeyType::R1,
            data: vec![0xab, 0xcd],
        };
        assert_eq!(sig.to_string(), "R1:abcd");
        let action = &sample_transaction().actions[0];
        assert_eq!(action.authorization_list(), "alice@active");
    }

    #[test]
    fn test_abi_json_uses_wire_field_names() {
        let mut abi = Abi::new("eosio::abi/1.1");
        abi.add_struct("greeting", "", &[("who", "name")]);
        abi.add_action(name("hi"), "greeting");
        let json = serde_json::to_value(&abi).unwrap();
        assert_eq!(json["structs"][0]["fields"][0]["type"], "name");
        assert_eq!(json["actions"][0]["name"], "hi");
    }

    #[test]
    fn test_value_display() {
        let value = Value::Struct(vec![
            ("to".to_string(), Value::Name(name("bob"))),
            (
                "quantity".to_string(),
                Value::Asset {
                    amount: -5,
                    precision: 4,
                    code: "EOS".to_string(),
                },
            ),
            ("memo".to_string(), Value::Optional(None)),
        ]);
        assert_eq!(value.to_string(), "{to: bob, quantity: -0.0005 EOS, memo: null}");
        assert_eq!(crate::models::value::format_amount(100, 0), "100");
    }
}
