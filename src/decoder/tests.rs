#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::codec::ByteWriter;
    use crate::models::name::Name;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    fn abi() -> Abi {
        let mut abi = Abi::new("eosio::abi/1.2");
        abi.add_type("account_name", "name");
        abi.add_type("who_t", "account_name");
        abi.add_struct("base", "", &[("id", "uint64")]);
        abi.add_struct("derived", "base", &[("owner", "who_t"), ("tags", "string[]")]);
        abi.add_struct("maybe", "", &[("note", "string?")]);
        abi.add_variant("shape", &["uint8", "string"]);
        abi.add_struct("holder", "", &[("shape", "shape")]);
        abi.add_struct("extended", "", &[("a", "uint8"), ("b", "uint16$")]);
        abi.add_struct("looped", "", &[("next", "looped[]")]);
        abi.add_action(name("make"), "derived");
        abi
    }

    fn derived_bytes() -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_u64(7);
        writer.write_u64(name("alice").value());
        writer.write_length(2);
        writer.write_string("x");
        writer.write_string("yz");
        writer.into_inner()
    }

    #[test]
    fn test_struct_with_base_and_typedefs() {
        let payload = decode(&derived_bytes(), &abi(), "derived").unwrap();
        assert_eq!(payload.trailing, 0);
        assert_eq!(
            payload.value,
            Value::Struct(vec![
                ("id".to_string(), Value::UInt(7)),
                ("owner".to_string(), Value::Name(name("alice"))),
                (
                    "tags".to_string(),
                    Value::Array(vec![Value::String("x".to_string()), Value::String("yz".to_string())])
                ),
            ])
        );
    }

    #[test]
    fn test_trailing_bytes_are_counted() {
        let mut bytes = derived_bytes();
        bytes.extend_from_slice(&[0, 0, 0]);
        assert_eq!(decode(&bytes, &abi(), "derived").unwrap().trailing, 3);
    }

    #[test]
    fn test_optional() {
        let abi = abi();
        let none = decode(&[0], &abi, "maybe").unwrap();
        assert_eq!(none.value.field("note"), Some(&Value::Optional(None)));

        let some = decode(&[1, 2, b'h', b'i'], &abi, "maybe").unwrap();
        assert_eq!(
            some.value.field("note"),
            Some(&Value::Optional(Some(Box::new(Value::String("hi".to_string())))))
        );

        let err = decode(&[2], &abi, "maybe").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidData { offset: 0, .. }));
    }

    #[test]
    fn test_variant() {
        let abi = abi();
        let value = decode(&[1, 1, b'q'], &abi, "holder").unwrap().value;
        assert_eq!(
            value.field("shape"),
            Some(&Value::Variant {
                type_name: "string".to_string(),
                value: Box::new(Value::String("q".to_string())),
            })
        );
        assert!(matches!(
            decode(&[5, 0], &abi, "shape").unwrap_err(),
            DecodeError::InvalidData { .. }
        ));
    }

    #[test]
    fn test_binary_extension() {
        let abi = abi();
        let short = decode(&[1], &abi, "extended").unwrap().value;
        assert_eq!(short, Value::Struct(vec![("a".to_string(), Value::UInt(1))]));

        let full = decode(&[1, 2, 0], &abi, "extended").unwrap().value;
        assert_eq!(full.field("b"), Some(&Value::UInt(2)));
    }

    #[test]
    fn test_truncated_is_recoverable() {
        let bytes = derived_bytes();
        let err = decode(&bytes[..10], &abi(), "derived").unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { offset: 8, needed: 8, remaining: 2 }));
        assert!(!err.is_structural());
    }

    #[test]
    fn test_array_of_empty_structs() {
        let mut abi = abi();
        abi.add_struct("empty", "", &[]);
        abi.add_struct("crowd", "", &[("members", "empty[]")]);

        let payload = decode(&[3], &abi, "crowd").unwrap();
        assert_eq!(payload.trailing, 0);
        assert_eq!(
            payload.value.field("members"),
            Some(&Value::Array(vec![Value::Struct(vec![]); 3]))
        );

        // 0x80 0x80 0x08 = 131072, past the cap with nothing left to read
        let err = decode(&[0x80, 0x80, 0x08], &abi, "crowd").unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { offset: 0, needed: 131_072, remaining: 0 }));
    }

    #[test]
    fn test_array_truncated_inside_element() {
        let err = decode(&[3, 1, 0, 0, 0, 2], &Abi::default(), "uint32[]").unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { offset: 5, needed: 4, remaining: 1 }));
    }

    #[test]
    fn test_unknown_type_is_structural() {
        let err = decode(&[0; 8], &abi(), "nonexistent").unwrap_err();
        assert_eq!(err, DecodeError::UnknownType("nonexistent".to_string()));
        assert!(err.is_structural());
        assert_eq!(err.class(), "schema error");
    }

    #[test]
    fn test_depth_limit() {
        // Every level holds exactly one child, so only the depth guard stops it
        let bytes = vec![1u8; MAX_DEPTH * 2];
        let err = decode(&bytes, &abi(), "looped").unwrap_err();
        assert_eq!(err, DecodeError::DepthExceeded(MAX_DEPTH));
    }

    #[test]
    fn test_cyclic_typedef() {
        let mut abi = Abi::new("eosio::abi/1.1");
        abi.add_type("a", "b");
        abi.add_type("b", "a");
        assert!(decode(&[0], &abi, "a").unwrap_err().is_structural());
    }

    #[test]
    fn test_builtin_asset_and_symbol() {
        let mut writer = ByteWriter::new();
        writer.write_i64(10_000);
        writer.write_u64(4 | (u64::from(b'E') << 8) | (u64::from(b'O') << 16) | (u64::from(b'S') << 24));
        let bytes = writer.into_inner();

        let empty = Abi::default();
        let asset = decode(&bytes, &empty, "asset").unwrap().value;
        assert_eq!(asset.to_string(), "1.0000 EOS");
        let symbol = decode(&bytes[8..], &empty, "symbol").unwrap().value;
        assert_eq!(symbol.to_string(), "4,EOS");
    }

    #[test]
    fn test_builtin_scalars() {
        let empty = Abi::default();
        assert_eq!(decode(&[0xff], &empty, "int8").unwrap().value, Value::Int(-1));
        assert_eq!(decode(&[0x03], &empty, "varint32").unwrap().value, Value::Int(-2));
        assert_eq!(decode(&[0x80, 0x01], &empty, "varuint32").unwrap().value, Value::UInt(128));
        assert!(decode(&[2], &empty, "bool").is_err());
        assert_eq!(
            decode(&[0xab; 32], &empty, "checksum256").unwrap().value,
            Value::Checksum(vec![0xab; 32])
        );
        assert!(decode(&[0; 10], &empty, "public_key").is_err());
    }

    #[test]
    fn test_undefined_types() {
        let mut abi = abi();
        assert!(undefined_types(&abi).is_empty());
        abi.add_struct("bad", "missing_base", &[("x", "ghost[]"), ("y", "ghost?")]);
        abi.add_variant("v", &["phantom"]);
        assert_eq!(undefined_types(&abi), vec!["missing_base", "ghost", "phantom"]);
    }
}
