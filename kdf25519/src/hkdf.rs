//! Generic HKDF (RFC 5869): extract-then-expand key derivation, generic
//! over the hash HMAC is instantiated with. [`noise`](crate::noise)'s
//! `mix_key` is this module specialized to BLAKE2s with one or two
//! 32-byte output blocks; other callers may need more.

use symmetric25519::hmac::{hmac, Hash};

/// `HKDF-Extract(salt, ikm) = HMAC-Hash(salt, ikm)`.
pub fn extract<H: Hash>(salt: &[u8], ikm: &[u8]) -> Vec<u8> {
    hmac::<H>(salt, ikm)
}

/// `HKDF-Expand(prk, info, length)`: emits `ceil(length / hash_len)`
/// blocks `T(i) = HMAC-Hash(prk, T(i-1) || info || i)`, `T(0)` empty,
/// truncated to `length` bytes.
pub fn expand<H: Hash>(prk: &[u8], info: &[u8], length: usize) -> Vec<u8> {
    let hash_len = H::OUTPUT_LEN;
    let n = length.div_ceil(hash_len);
    assert!(n <= 255, "HKDF-Expand: requested length too large");

    let mut okm = Vec::with_capacity(n * hash_len);
    let mut t = Vec::new();
    for i in 1..=n {
        let mut input = t.clone();
        input.extend_from_slice(info);
        input.push(i as u8);
        t = hmac::<H>(prk, &input);
        okm.extend_from_slice(&t);
    }
    okm.truncate(length);
    okm
}

/// One-shot extract-then-expand.
pub fn derive<H: Hash>(salt: &[u8], ikm: &[u8], info: &[u8], length: usize) -> Vec<u8> {
    let prk = extract::<H>(salt, ikm);
    expand::<H>(&prk, info, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use symmetric25519::hmac::Sha256;

    // RFC 5869 appendix A.1.
    #[test]
    fn rfc5869_case1_sha256() {
        let ikm = hex::decode("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b").unwrap();
        let salt = hex::decode("000102030405060708090a0b0c").unwrap();
        let info = hex::decode("f0f1f2f3f4f5f6f7f8f9").unwrap();
        let okm = derive::<Sha256>(&salt, &ikm, &info, 42);
        assert_eq!(
            hex::encode(okm),
            "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865"
        );
    }
}
