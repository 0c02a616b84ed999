// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Word encodings of Yul literals
//!
//! String literals become one 32-byte word: the raw bytes, right-padded with zeros.
//! Stripping trailing zeros recovers the content, except for strings that legitimately
//! end in zero bytes; those are ambiguous after padding.

use super::nodes::{Literal, LiteralKind};
use itertools::Itertools;

/// Width in bytes of a Yul machine word.
pub const WORD_SIZE: usize = 32;

/// Right-pad `bytes` with zeros to one word. Longer inputs are returned unchanged.
pub fn pad_string_literal(bytes: &[u8]) -> Vec<u8> {
    let mut padded = bytes.to_vec();
    if padded.len() < WORD_SIZE {
        padded.resize(WORD_SIZE, 0);
    }
    padded
}

/// Inverse of [`pad_string_literal`] for content without trailing zero bytes.
pub fn decode_padded_string(padded: &[u8]) -> Vec<u8> {
    let end = padded
        .iter()
        .rposition(|&byte| byte != 0)
        .map_or(0, |last| last + 1);
    padded[..end].to_vec()
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}

impl Literal {
    pub fn string(value: &str) -> Self {
        Self {
            kind: LiteralKind::String,
            value: value.to_string(),
            hex_value: None,
        }
    }

    /// Raw bytes of a string literal, preferring the compiler's hex encoding.
    pub fn raw_bytes(&self) -> Vec<u8> {
        self.hex_value
            .as_deref()
            .and_then(decode_hex)
            .unwrap_or_else(|| self.value.as_bytes().to_vec())
    }

    /// `0x`-prefixed hex of the padded word, 64 digits for strings up to one word.
    pub fn padded_hex(&self) -> String {
        let digits = pad_string_literal(&self.raw_bytes())
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .join("");
        format!("0x{}", digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_string_is_padded_and_recoverable() {
        let padded = pad_string_literal(b"abc");
        assert_eq!(padded.len(), WORD_SIZE);
        assert_eq!(&padded[..3], b"abc");
        assert!(padded[3..].iter().all(|&b| b == 0));
        assert_eq!(decode_padded_string(&padded), b"abc".to_vec());
    }

    #[test]
    fn test_trailing_zero_content_is_ambiguous() {
        let padded = pad_string_literal(b"ab\0");
        assert_eq!(decode_padded_string(&padded), b"ab".to_vec());
    }

    #[test]
    fn test_padded_hex_prefers_hex_value() {
        let literal = Literal {
            kind: LiteralKind::String,
            value: "ignored".to_string(),
            hex_value: Some("4142".to_string()),
        };
        let hex = literal.padded_hex();
        assert_eq!(hex.len(), 2 + 2 * WORD_SIZE);
        assert!(hex.starts_with("0x4142"));
        assert!(hex[6..].chars().all(|c| c == '0'));
    }

    #[test]
    fn test_padded_hex_from_text() {
        assert_eq!(
            Literal::string("A").padded_hex(),
            format!("0x41{}", "0".repeat(62))
        );
    }
}
