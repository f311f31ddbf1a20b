//! Hex formatting for raw row bytes.
//!
//! Used by the `hex` column kind and by `drill rows --dump`.

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Format a byte offset as "decimal (0xhex)".
pub fn format_offset(offset: usize) -> String {
    format!("{} (0x{:x})", offset, offset)
}

/// Format bytes as a compact lowercase hex string (e.g. "4a2f00ff").
pub fn format_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for b in data {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Hex dump of `data`, labelling lines with file offsets from `base_offset`.
///
/// ```text
/// 00000040  01 00 0c 00 68 65 6c 6c  6f 20 77 6f 72 6c 64 00  |....hello world.|
/// ```
pub fn hex_dump(data: &[u8], base_offset: usize) -> String {
    let mut out = String::new();

    for (i, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:08x}  ", base_offset + i * BYTES_PER_LINE);

        for j in 0..BYTES_PER_LINE {
            if j == BYTES_PER_LINE / 2 {
                out.push(' ');
            }
            match chunk.get(j) {
                Some(b) => {
                    let _ = write!(out, "{:02x} ", b);
                }
                None => out.push_str("   "),
            }
        }

        out.push_str(" |");
        for j in 0..BYTES_PER_LINE {
            out.push(match chunk.get(j) {
                Some(b) if b.is_ascii_graphic() || *b == b' ' => *b as char,
                Some(_) => '.',
                None => ' ',
            });
        }
        out.push('|');
    }

    out
}
