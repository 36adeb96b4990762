//! # 比特编解码模块
//!
//! 在文本载荷与二进制位序列之间转换，并负责追加/定位结束标记。
//! 所有载体共享同一套位流协议：每个字符展开为 8 位（高位在前），
//! 载荷末尾恰好追加一次 [`EOF_MARKER`]。

use crate::constants::EOF_MARKER;
use crate::error::StegoError;

/// 将文本载荷展开为位序列，每个字符 8 位，高位在前。
///
/// 码点超出 U+00FF 的字符无法用单字节表示，直接拒绝，
/// 避免在嵌入时静默截断。
pub fn to_bits(payload: &str) -> Result<Vec<u8>, StegoError> {
    let mut bits = Vec::with_capacity(payload.len() * 8);
    for ch in payload.chars() {
        let code = u32::from(ch);
        if code > 0xFF {
            return Err(StegoError::PayloadNotEightBit(ch));
        }
        for shift in (0..8).rev() {
            bits.push(((code >> shift) & 1) as u8);
        }
    }
    Ok(bits)
}

/// [`to_bits`] 的逆操作：每 8 位还原为一个字符，末尾不足 8 位的部分丢弃。
pub fn from_bits(bits: &[u8]) -> String {
    bits.chunks_exact(8)
        .map(|group| {
            let code = group.iter().fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
            char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect()
}

/// 在载荷位序列末尾追加结束标记，返回嵌入就绪的完整位序列。
pub fn with_marker(mut bits: Vec<u8>) -> Vec<u8> {
    bits.extend_from_slice(&EOF_MARKER);
    bits
}

/// 返回结束标记在位序列中首次出现的下标。
pub fn find_marker(bits: &[u8]) -> Option<usize> {
    if bits.len() < EOF_MARKER.len() {
        return None;
    }
    bits.windows(EOF_MARKER.len()).position(|window| window == EOF_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_ascii() {
        let text = "HELLO, steganography! 0123";
        assert_eq!(from_bits(&to_bits(text).unwrap()), text);
    }

    #[test]
    fn roundtrip_latin1() {
        let text = "caf\u{e9}";
        assert_eq!(from_bits(&to_bits(text).unwrap()), text);
    }

    #[test]
    fn rejects_wide_characters() {
        let result = to_bits("绝密");
        assert!(matches!(result, Err(StegoError::PayloadNotEightBit(_))));
    }

    #[test]
    fn marker_is_appended_once_at_the_end() {
        let bits = with_marker(to_bits("A").unwrap());
        assert_eq!(bits.len(), 8 + 16);
        assert_eq!(&bits[8..], &EOF_MARKER);
    }

    #[test]
    fn finds_first_marker_at_true_payload_length() {
        let payload_bits = to_bits("HELLO").unwrap();
        let bits = with_marker(payload_bits.clone());
        assert_eq!(find_marker(&bits), Some(payload_bits.len()));
    }

    #[test]
    fn ascii_payload_never_produces_an_early_marker() {
        // ASCII 字符最高位为 0，位流中 1 的连续长度不足以伪造标记。
        for seed in 0u32..64 {
            let text: String = (0..32)
                .map(|i| char::from(b' ' + ((seed.wrapping_mul(31).wrapping_add(i * 7)) % 95) as u8))
                .collect();
            let payload_bits = to_bits(&text).unwrap();
            let bits = with_marker(payload_bits.clone());
            assert_eq!(find_marker(&bits), Some(payload_bits.len()), "payload: {text}");
        }
    }

    #[test]
    fn missing_marker_is_none() {
        assert_eq!(find_marker(&to_bits("no marker here").unwrap()), None);
        assert_eq!(find_marker(&[1, 1, 1, 0]), None);
    }
}
