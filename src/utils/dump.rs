//! Hex dumps for verbose output

use crate::constants::DUMP_LINE_WIDTH;

/// Canonical `hexdump -C` style rendering, one line per 16 bytes.
///
/// Empty input produces no lines.
pub fn hex_dump(data: &[u8]) -> Vec<String> {
    data.chunks(DUMP_LINE_WIDTH)
        .enumerate()
        .map(|(i, chunk)| {
            let mut hex_part = String::with_capacity(DUMP_LINE_WIDTH * 3 + 1);
            for (j, byte) in chunk.iter().enumerate() {
                if j == DUMP_LINE_WIDTH / 2 {
                    hex_part.push(' ');
                }
                hex_part.push_str(&hex::encode([*byte]));
                hex_part.push(' ');
            }
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            format!("{:08x}  {:<49} |{}|", i * DUMP_LINE_WIDTH, hex_part, ascii)
        })
        .collect()
}
