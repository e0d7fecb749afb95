//! The Noise Protocol Framework's two state-update primitives, `mix_hash`
//! and `mix_key`, built on BLAKE2s (both the transcript hash and the
//! HKDF's HMAC instantiation).

use symmetric25519::hmac::Blake2s;

use crate::hkdf;

/// Noise `h`: a running transcript hash.
pub type Handshake = [u8; 32];
/// Noise `ck`: the chaining key threaded through successive `mix_key`
/// calls.
pub type ChainKey = [u8; 32];

/// `h ← H(h ‖ data)`.
pub fn mix_hash(h: &mut Handshake, data: &[u8]) {
    let mut input = h.to_vec();
    input.extend_from_slice(data);
    let digest = symmetric25519::blake2s::hash(&input, 32);
    h.copy_from_slice(&digest);
}

/// Initializes `(ck, h)` from a protocol name and a prologue, per the
/// Noise spec's `Initialize` step: `h` starts as the protocol name
/// (zero-padded to 32 bytes if it fits, else `H(name)` if it doesn't),
/// `ck` starts equal to `h`, then the prologue is mixed into `h`.
pub fn mix_hash_init(protocol_name: &str, prologue: &[u8]) -> (ChainKey, Handshake) {
    let name_bytes = protocol_name.as_bytes();
    let mut h = [0u8; 32];
    if name_bytes.len() <= 32 {
        h[..name_bytes.len()].copy_from_slice(name_bytes);
    } else {
        let digest = symmetric25519::blake2s::hash(name_bytes, 32);
        h.copy_from_slice(&digest);
    }
    let ck = h;
    mix_hash(&mut h, prologue);
    (ck, h)
}

/// `mix_key`: runs HKDF-BLAKE2s over `ck` (as salt) and `input_key_material`,
/// producing one or two 32-byte outputs. With one output, returns the new
/// chaining key `ck'`; with two, also returns a cipher key `k`.
pub fn mix_key(ck: &ChainKey, input_key_material: &[u8], want_cipher_key: bool) -> (ChainKey, Option<[u8; 32]>) {
    let length = if want_cipher_key { 64 } else { 32 };
    let okm = hkdf::derive::<Blake2s>(ck, input_key_material, b"", length);

    let mut new_ck = [0u8; 32];
    new_ck.copy_from_slice(&okm[0..32]);

    let k = if want_cipher_key {
        let mut k = [0u8; 32];
        k.copy_from_slice(&okm[32..64]);
        Some(k)
    } else {
        None
    };

    (new_ck, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_hash_is_deterministic_and_order_sensitive() {
        let mut h1 = [1u8; 32];
        let mut h2 = [1u8; 32];
        mix_hash(&mut h1, b"a");
        mix_hash(&mut h1, b"b");
        mix_hash(&mut h2, b"ab");
        assert_ne!(h1, h2, "mix_hash must not be associative across calls");
    }

    #[test]
    fn mix_hash_init_short_name_is_zero_padded() {
        let (ck, h) = mix_hash_init("abc", b"");
        assert_eq!(&ck[..3], b"abc");
        assert_eq!(&ck[3..], &[0u8; 29][..]);
        // prologue is empty, so h should equal ck pre-mix hashed with
        // nothing appended -- i.e. H(ck || "") rather than ck itself.
        assert_ne!(h, ck);
    }

    #[test]
    fn mix_hash_init_long_name_is_hashed() {
        let long_name = "x".repeat(40);
        let (ck, _h) = mix_hash_init(&long_name, b"");
        assert_eq!(&ck[..], &symmetric25519::blake2s::hash(long_name.as_bytes(), 32)[..]);
    }

    #[test]
    fn mix_key_without_cipher_key_returns_none() {
        let ck = [3u8; 32];
        let (new_ck, k) = mix_key(&ck, b"dh output", false);
        assert!(k.is_none());
        assert_ne!(new_ck, ck);
    }

    #[test]
    fn mix_key_with_cipher_key_differs_from_chain_key() {
        let ck = [3u8; 32];
        let (new_ck, k) = mix_key(&ck, b"dh output", true);
        assert!(k.is_some());
        assert_ne!(new_ck, k.unwrap());
    }
}
