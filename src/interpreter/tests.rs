#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::codec;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    fn full_abi() -> Abi {
        let mut abi = Abi::new("eosio::abi/1.2");
        abi.add_type("account_name", "name");
        abi.add_struct("account", "", &[("balance", "asset")]);
        abi.add_struct("transfer", "", &[("from", "account_name"), ("to", "account_name")]);
        abi.add_action(name("transfer"), "transfer");
        abi.tables.push(TableDef {
            name: name("accounts"),
            index_type: "i64".to_string(),
            key_names: vec!["currency".to_string()],
            key_types: vec!["uint64".to_string()],
            ty: "account".to_string(),
        });
        abi.ricardian_clauses.push(ClausePair {
            id: "terms".to_string(),
            body: "be nice".to_string(),
        });
        abi.error_messages.push(ErrorMessage {
            error_code: 42,
            error_msg: "nope".to_string(),
        });
        abi.abi_extensions.push(Extension {
            kind: 3,
            data: vec![1, 2],
        });
        abi.add_variant("either", &["uint8", "string"]);
        abi.action_results.push(ActionResultDef {
            name: name("transfer"),
            result_type: "uint8".to_string(),
        });
        abi
    }

    #[test]
    fn test_encode_then_interpret_is_identity() {
        let abi = full_abi();
        assert_eq!(interpret(&codec::to_bytes(&abi)).unwrap(), abi);
    }

    #[test]
    fn test_trailing_bytes_after_document() {
        let mut bytes = codec::to_bytes(&full_abi());
        bytes.extend_from_slice(&[7, 7, 7]);
        let document = interpret_document(&bytes).unwrap();
        assert_eq!(document.trailing, 3);
        assert_eq!(document.abi, full_abi());

        let exact = interpret_document(&codec::to_bytes(&full_abi())).unwrap();
        assert_eq!(exact.trailing, 0);
    }

    #[test]
    fn test_counts_match_blob() {
        let mut abi = Abi::new("eosio::abi/1.1");
        abi.add_struct("a", "", &[("x", "uint8")]);
        abi.add_struct("b", "a", &[]);
        abi.add_action(name("go"), "b");

        let decoded = interpret(&codec::to_bytes(&abi)).unwrap();
        assert_eq!(decoded.structs.len(), 2);
        assert_eq!(decoded.actions.len(), 1);
        assert!(decoded.tables.is_empty());
        assert!(decoded.variants.is_empty());
        assert_eq!(decoded.find_struct("b").unwrap().base, "a");
    }

    #[test]
    fn test_older_abi_without_extensions() {
        // 1.0 documents end right after abi_extensions
        let mut abi = Abi::new("eosio::abi/1.0");
        abi.add_struct("a", "", &[]);
        let bytes = codec::to_bytes(&abi);
        let decoded = interpret(&bytes).unwrap();
        assert!(decoded.variants.is_empty());
        assert!(decoded.action_results.is_empty());
        assert_eq!(decoded, abi);
    }

    #[test]
    fn test_truncated_abi_fails() {
        let bytes = codec::to_bytes(&full_abi());
        for cut in [0, 1, bytes.len() / 3, bytes.len() - 1] {
            let err = interpret(&bytes[..cut]).unwrap_err();
            assert!(!err.is_structural(), "cut at {} gave {}", cut, err);
        }
    }

    #[test]
    fn test_meta_schema_describes_itself() {
        let meta = meta_schema();
        assert!(meta.find_struct(ABI_DEF_TYPE).is_some());
        assert!(crate::decoder::undefined_types(meta).is_empty());

        // The meta-schema can be shipped as an ABI blob and read back
        let decoded = interpret(&codec::to_bytes(meta)).unwrap();
        assert_eq!(&decoded, meta);
    }

    #[test]
    fn test_abi_from_value_rejects_mistyped_fields() {
        let value = Value::Struct(vec![("version".to_string(), Value::UInt(1))]);
        assert!(abi_from_value(&value).is_err());
    }
}
