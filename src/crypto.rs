//! # 加密协作层
//!
//! 在嵌入前/提取后对载荷做口令对称加密。密钥由 HKDF-SHA256
//! 从口令确定性导出（相同口令恒得相同密钥），密文用
//! ChaCha20-Poly1305 认证加密，随机 nonce 前置后整体 base64 编码，
//! 因此密文始终是纯 ASCII 字符串，位编解码器必然接受。

use crate::error::StegoError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;

const KDF_SALT: &[u8] = b"LSB-STASH-SALT-V1";
const KDF_INFO: &[u8] = b"LSB-STASH-PAYLOAD-KEY";
const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

/// 从口令确定性导出 256 位对称密钥。
fn derive_key(password: &str) -> Result<[u8; 32], StegoError> {
    let hk = Hkdf::<Sha256>::new(Some(KDF_SALT), password.as_bytes());
    let mut key = [0u8; 32];
    hk.expand(KDF_INFO, &mut key)
        .map_err(|_| StegoError::Codec("key derivation failed".to_string()))?;
    Ok(key)
}

/// 用口令加密明文，返回 base64 编码的不透明令牌。
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, StegoError> {
    let key = derive_key(password)?;
    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| StegoError::Codec(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce_bytes);

    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|e| StegoError::Codec(e.to_string()))?;

    let mut token = Vec::with_capacity(NONCE_SIZE + sealed.len());
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&sealed);
    Ok(STANDARD.encode(token))
}

/// 用口令解密令牌。口令错误、令牌被篡改或根本不是令牌时
/// 一律返回 [`StegoError::WrongPasswordOrCorruptData`]。
pub fn decrypt(token: &str, password: &str) -> Result<String, StegoError> {
    let raw = STANDARD
        .decode(token.trim())
        .map_err(|_| StegoError::WrongPasswordOrCorruptData)?;
    if raw.len() < NONCE_SIZE + TAG_SIZE {
        return Err(StegoError::WrongPasswordOrCorruptData);
    }

    let key = derive_key(password)?;
    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| StegoError::Codec(e.to_string()))?;

    let plain = cipher
        .decrypt(Nonce::from_slice(&raw[..NONCE_SIZE]), &raw[NONCE_SIZE..])
        .map_err(|_| StegoError::WrongPasswordOrCorruptData)?;

    String::from_utf8(plain).map_err(|_| StegoError::WrongPasswordOrCorruptData)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let token = encrypt("HELLO", "pw1").unwrap();
        assert_eq!(decrypt(&token, "pw1").unwrap(), "HELLO");
    }

    #[test]
    fn token_is_ascii() {
        let token = encrypt("任意明文也可以", "pw").unwrap();
        assert!(token.is_ascii());
    }

    #[test]
    fn wrong_password_fails() {
        let token = encrypt("HELLO", "pw1").unwrap();
        assert!(matches!(
            decrypt(&token, "pw2"),
            Err(StegoError::WrongPasswordOrCorruptData)
        ));
    }

    #[test]
    fn tampered_token_fails() {
        let token = encrypt("HELLO", "pw1").unwrap();
        let mut raw = STANDARD.decode(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 1;
        let tampered = STANDARD.encode(raw);
        assert!(matches!(
            decrypt(&tampered, "pw1"),
            Err(StegoError::WrongPasswordOrCorruptData)
        ));
    }

    #[test]
    fn garbage_token_fails() {
        assert!(matches!(
            decrypt("definitely not a token", "pw"),
            Err(StegoError::WrongPasswordOrCorruptData)
        ));
    }

    #[test]
    fn key_derivation_is_deterministic() {
        assert_eq!(derive_key("pw").unwrap(), derive_key("pw").unwrap());
        assert_ne!(derive_key("pw").unwrap(), derive_key("pw2").unwrap());
    }
}
