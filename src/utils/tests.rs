#[cfg(test)]
mod tests {
    use crate::utils::dump::hex_dump;
    use crate::utils::hash::sha256_hex;
    use crate::utils::pattern::{find_pattern, marker_hits};
    use crate::utils::time::{format_relative, format_span};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_find_pattern() {
        assert!(find_pattern(b"hello SYS token", b"SYS"));
        assert!(!find_pattern(b"hello SY S token", b"SYS"));
        assert!(!find_pattern(b"SY", b"SYS"));
        assert!(find_pattern(b"", b""));

        let hits = marker_hits(b"xxEOSxx", &[&b"SYS"[..], &b"EOS"[..]]);
        assert_eq!(hits, vec![(&b"SYS"[..], false), (&b"EOS"[..], true)]);
    }

    #[test]
    fn test_hex_dump_layout() {
        assert!(hex_dump(&[]).is_empty());

        let data: Vec<u8> = (0x41..0x41 + 18).collect();
        let lines = hex_dump(&data);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "00000000  41 42 43 44 45 46 47 48  49 4a 4b 4c 4d 4e 4f 50  |ABCDEFGHIJKLMNOP|"
        );
        assert!(lines[1].starts_with("00000010  51 52 "));
        assert!(lines[1].ends_with("|QR|"));
    }

    #[test]
    fn test_format_span() {
        assert_eq!(format_span(Duration::seconds(0)), "0s");
        assert_eq!(format_span(Duration::seconds(3723)), "1h 2m 3s");
        assert_eq!(format_span(Duration::seconds(-120)), "2m");
        assert_eq!(format_span(Duration::seconds(90_061)), "1d 1h 1m 1s");
    }

    #[test]
    fn test_format_relative() {
        let now = Utc.timestamp_opt(1_000_000, 0).unwrap();
        let later = Utc.timestamp_opt(1_000_300, 0).unwrap();
        assert_eq!(format_relative(later, now), "in 5m");
        assert_eq!(format_relative(now, later), "expired 5m ago");
    }
}
