/// Number of continuation bytes that follow a UTF-8 leading byte.
///
/// `110xxxxx` → 1, `1110xxxx` → 2, `11110xxx` → 3. ASCII, stray
/// continuation bytes, and invalid leads all return 0.
pub fn continuation_len(lead: u8) -> usize {
    match lead {
        0b1100_0000..=0b1101_1111 => 1,
        0b1110_0000..=0b1110_1111 => 2,
        0b1111_0000..=0b1111_0111 => 3,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii() {
        assert_eq!(continuation_len(b'a'), 0);
        assert_eq!(continuation_len(0x7f), 0);
    }

    #[test]
    fn leads_match_encoded_lengths() {
        for ch in ['é', '✓', '🦀'] {
            let mut buf = [0u8; 4];
            let encoded = ch.encode_utf8(&mut buf);
            assert_eq!(continuation_len(encoded.as_bytes()[0]), encoded.len() - 1);
        }
    }

    #[test]
    fn continuation_and_invalid_bytes() {
        assert_eq!(continuation_len(0x80), 0);
        assert_eq!(continuation_len(0xbf), 0);
        assert_eq!(continuation_len(0xf8), 0);
        assert_eq!(continuation_len(0xff), 0);
    }
}
