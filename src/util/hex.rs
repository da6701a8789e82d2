//! Hex helpers shared by identifier generation and key handling.

#[cfg(test)]
#[path = "hex_test.rs"]
mod hex_test;

use std::fmt::Write;

/// Lowercase hex encoding of `bytes`.
#[must_use]
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// True when `raw` is exactly `len` ASCII hex digits.
#[must_use]
pub fn is_hex_of_len(raw: &str, len: usize) -> bool {
    raw.len() == len && raw.bytes().all(|b| b.is_ascii_hexdigit())
}
