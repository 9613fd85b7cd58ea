// src/protocol/text.rs
//! Rendering of the game's character set as plain text.
//!
//! The low 32 codes carry bracket and "colored digit" glyphs, and the high
//! bit selects the alternate (brown/gold) font. Both collapse to ASCII here.

const CHARSET: [u8; 32] = [
    b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ',
    b'[', b']', b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b' ', b' ', b' ', b' ',
];

/// Decodes raw protocol text into a trimmed, printable string. Total.
pub fn to_plain_text(raw: &[u8]) -> String {
    let decoded: String = raw
        .iter()
        .map(|&byte| {
            let mapped = if (byte as usize) < CHARSET.len() {
                CHARSET[byte as usize]
            } else {
                byte & 0x7f
            };
            char::from(mapped)
        })
        .collect();

    decoded.trim().to_string()
}

/// Ordinal value per character, for exact comparisons of decoded names.
pub fn to_char_codes(text: &str) -> Vec<u32> {
    text.chars().map(|c| c as u32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_is_unchanged() {
        assert_eq!(to_plain_text(b"Test Server"), "Test Server");
        assert_eq!(to_plain_text(b"  padded  "), "padded");
    }

    #[test]
    fn low_codes_use_the_substitution_table() {
        assert_eq!(to_plain_text(&[0x12]), "0");
        assert_eq!(to_plain_text(&[0x10, b'x', 0x11]), "[x]");
        assert_eq!(to_plain_text(&[b'a', 0x05, b'b']), "a b");
        assert_eq!(to_plain_text(b"A"), "A");
    }

    #[test]
    fn high_bit_is_cleared() {
        // 0xC1 is 'A' in the alternate font.
        assert_eq!(to_plain_text(&[0xC1, 0xE2, 0xE3]), "Abc");
        assert_eq!(to_plain_text(&[0xA0, b'x', 0xA0]), "x");
    }

    #[test]
    fn char_codes_follow_characters() {
        assert_eq!(to_char_codes("Foo"), vec![70, 111, 111]);
        assert!(to_char_codes("").is_empty());
    }
}
