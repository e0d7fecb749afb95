//! HMAC (RFC 2104), generic over any hash with a fixed block and output
//! size, via the small [`Hash`] trait below rather than a concrete
//! BLAKE2/SHA-2 type — [`crate::hkdf`] and the Noise `mix_key` derivation
//! in `kdf25519` both instantiate it with BLAKE2s, while Ed25519-adjacent
//! code could equally instantiate it with SHA-512.

/// A fixed-size one-shot hash function, the minimal surface HMAC needs.
pub trait Hash {
    const BLOCK_LEN: usize;
    const OUTPUT_LEN: usize;
    fn hash(data: &[u8]) -> Vec<u8>;
}

pub struct Sha256;
impl Hash for Sha256 {
    const BLOCK_LEN: usize = 64;
    const OUTPUT_LEN: usize = 32;
    fn hash(data: &[u8]) -> Vec<u8> {
        crate::sha2::sha256(data).to_vec()
    }
}

pub struct Sha512;
impl Hash for Sha512 {
    const BLOCK_LEN: usize = 128;
    const OUTPUT_LEN: usize = 64;
    fn hash(data: &[u8]) -> Vec<u8> {
        crate::sha2::sha512(data).to_vec()
    }
}

pub struct Blake2s;
impl Hash for Blake2s {
    const BLOCK_LEN: usize = 64;
    const OUTPUT_LEN: usize = 32;
    fn hash(data: &[u8]) -> Vec<u8> {
        crate::blake2s::hash(data, 32)
    }
}

pub struct Blake2b;
impl Hash for Blake2b {
    const BLOCK_LEN: usize = 128;
    const OUTPUT_LEN: usize = 64;
    fn hash(data: &[u8]) -> Vec<u8> {
        crate::blake2b::hash(data, 64)
    }
}

/// `HMAC-H(key, data)`. Keys longer than the block size are pre-hashed
/// per RFC 2104; shorter keys are zero-padded.
pub fn hmac<H: Hash>(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut block_key = vec![0u8; H::BLOCK_LEN];
    if key.len() > H::BLOCK_LEN {
        let hashed = H::hash(key);
        block_key[..hashed.len()].copy_from_slice(&hashed);
    } else {
        block_key[..key.len()].copy_from_slice(key);
    }

    let mut ipad = vec![0x36u8; H::BLOCK_LEN];
    let mut opad = vec![0x5cu8; H::BLOCK_LEN];
    for i in 0..H::BLOCK_LEN {
        ipad[i] ^= block_key[i];
        opad[i] ^= block_key[i];
    }

    let mut inner_input = ipad;
    inner_input.extend_from_slice(data);
    let inner = H::hash(&inner_input);

    let mut outer_input = opad;
    outer_input.extend_from_slice(&inner);
    H::hash(&outer_input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_sha256_rfc4231_case1() {
        let key = [0x0bu8; 20];
        let data = b"Hi There";
        let mac = hmac::<Sha256>(&key, data);
        assert_eq!(
            hex::encode(mac),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn hmac_is_deterministic_for_blake2s() {
        let a = hmac::<Blake2s>(b"key", b"msg");
        let b = hmac::<Blake2s>(b"key", b"msg");
        assert_eq!(a, b);
    }

    #[test]
    fn hmac_with_long_key_prehashes() {
        let key = vec![0xaa; 200];
        let a = hmac::<Sha256>(&key, b"data");
        assert_eq!(a.len(), 32);
    }
}
