//! The ChaCha20 stream cipher (RFC 8439's 20-round core) and HChaCha20 key
//! derivation.
//!
//! Two block-addressing flavors coexist behind the same quarter-round
//! core, matching the two ways the amber source drives it:
//!
//! - [`block64`]/[`xor64`]: a 64-bit nonce and a 64-bit block counter, the
//!   original djb `crypto_stream` convention. The counter is taken as a
//!   signed `i64` so callers (the multi-recipient AEAD layer) can address
//!   block `-i` to key recipient `i`'s Poly1305 tag from a distinct
//!   keystream block than recipient `0`.
//! - [`block_ietf`]/[`xor_ietf`]: RFC 8439's 96-bit nonce and 32-bit
//!   counter, for interop with implementations that only speak the IETF
//!   variant.
//!
//! Block 0 of the 64-bit-nonce flavor is reserved by convention for
//! Poly1305 one-time keys; stream encryption starts at block 1. Callers
//! own that convention (see `aead25519`); this module only computes
//! blocks at whatever index it is given.

use zeroize::Zeroize;

/// The ChaCha20 key: eight 32-bit words (little-endian halves of the
/// 32-byte key), kept in a dedicated type so key material never has to
/// round-trip through a raw byte slice at call sites that only need to
/// pass it along.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Chakey(pub [u32; 8]);

impl Chakey {
    pub const ZERO: Chakey = Chakey([0u32; 8]);

    pub fn from_bytes(bytes: &[u8; 32]) -> Chakey {
        let mut words = [0u32; 8];
        for i in 0..8 {
            words[i] = u32::from_le_bytes(bytes[i * 4..i * 4 + 4].try_into().unwrap());
        }
        Chakey(words)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..8 {
            out[i * 4..i * 4 + 4].copy_from_slice(&self.0[i].to_le_bytes());
        }
        out
    }
}

const CONSTANTS: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

#[inline]
fn quarter_round(a: &mut u32, b: &mut u32, c: &mut u32, d: &mut u32) {
    *a = a.wrapping_add(*b);
    *d ^= *a;
    *d = d.rotate_left(16);
    *c = c.wrapping_add(*d);
    *b ^= *c;
    *b = b.rotate_left(12);
    *a = a.wrapping_add(*b);
    *d ^= *a;
    *d = d.rotate_left(8);
    *c = c.wrapping_add(*d);
    *b ^= *c;
    *b = b.rotate_left(7);
}

fn core(mut state: [u32; 16]) -> [u8; 64] {
    let input = state;
    for _ in 0..10 {
        // column rounds
        let (mut a, mut b, mut c, mut d) = (state[0], state[4], state[8], state[12]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[0] = a;
        state[4] = b;
        state[8] = c;
        state[12] = d;

        let (mut a, mut b, mut c, mut d) = (state[1], state[5], state[9], state[13]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[1] = a;
        state[5] = b;
        state[9] = c;
        state[13] = d;

        let (mut a, mut b, mut c, mut d) = (state[2], state[6], state[10], state[14]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[2] = a;
        state[6] = b;
        state[10] = c;
        state[14] = d;

        let (mut a, mut b, mut c, mut d) = (state[3], state[7], state[11], state[15]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[3] = a;
        state[7] = b;
        state[11] = c;
        state[15] = d;

        // diagonal rounds
        let (mut a, mut b, mut c, mut d) = (state[0], state[5], state[10], state[15]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[0] = a;
        state[5] = b;
        state[10] = c;
        state[15] = d;

        let (mut a, mut b, mut c, mut d) = (state[1], state[6], state[11], state[12]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[1] = a;
        state[6] = b;
        state[11] = c;
        state[12] = d;

        let (mut a, mut b, mut c, mut d) = (state[2], state[7], state[8], state[13]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[2] = a;
        state[7] = b;
        state[8] = c;
        state[13] = d;

        let (mut a, mut b, mut c, mut d) = (state[3], state[4], state[9], state[14]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[3] = a;
        state[4] = b;
        state[9] = c;
        state[14] = d;
    }

    let mut out = [0u8; 64];
    for i in 0..16 {
        let word = state[i].wrapping_add(input[i]);
        out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    out
}

/// One 64-byte keystream block, 64-bit-nonce flavor: state words 12-13
/// hold the block index (as two's-complement `i64`, little-endian),
/// words 14-15 hold the nonce.
pub fn block64(key: &Chakey, nonce: u64, block_index: i64) -> [u8; 64] {
    let idx = block_index as u64;
    let state = [
        CONSTANTS[0],
        CONSTANTS[1],
        CONSTANTS[2],
        CONSTANTS[3],
        key.0[0],
        key.0[1],
        key.0[2],
        key.0[3],
        key.0[4],
        key.0[5],
        key.0[6],
        key.0[7],
        idx as u32,
        (idx >> 32) as u32,
        nonce as u32,
        (nonce >> 32) as u32,
    ];
    core(state)
}

/// One 64-byte keystream block, RFC 8439 IETF flavor: 96-bit nonce,
/// 32-bit counter.
pub fn block_ietf(key: &Chakey, nonce: &[u8; 12], counter: u32) -> [u8; 64] {
    let n0 = u32::from_le_bytes(nonce[0..4].try_into().unwrap());
    let n1 = u32::from_le_bytes(nonce[4..8].try_into().unwrap());
    let n2 = u32::from_le_bytes(nonce[8..12].try_into().unwrap());
    let state = [
        CONSTANTS[0],
        CONSTANTS[1],
        CONSTANTS[2],
        CONSTANTS[3],
        key.0[0],
        key.0[1],
        key.0[2],
        key.0[3],
        key.0[4],
        key.0[5],
        key.0[6],
        key.0[7],
        counter,
        n0,
        n1,
        n2,
    ];
    core(state)
}

/// XORs `data` in place with the keystream starting at `start_block`,
/// 64-bit-nonce flavor. `start_block` may be negative (see module docs).
pub fn xor64(key: &Chakey, nonce: u64, start_block: i64, data: &mut [u8]) {
    let mut block_index = start_block;
    for chunk in data.chunks_mut(64) {
        let ks = block64(key, nonce, block_index);
        for (b, k) in chunk.iter_mut().zip(ks.iter()) {
            *b ^= *k;
        }
        block_index = block_index.wrapping_add(1);
    }
}

/// XORs `data` in place with the keystream starting at `counter`, IETF
/// flavor.
pub fn xor_ietf(key: &Chakey, nonce: &[u8; 12], counter: u32, data: &mut [u8]) {
    let mut ctr = counter;
    for chunk in data.chunks_mut(64) {
        let ks = block_ietf(key, nonce, ctr);
        for (b, k) in chunk.iter_mut().zip(ks.iter()) {
            *b ^= *k;
        }
        ctr = ctr.wrapping_add(1);
    }
}

/// The 8-round permutation used by scrypt's `BlockMix` (`chacha208` in
/// the spec), exposed separately from the 20-round stream cipher core
/// since scrypt never constructs a `Chakey`/nonce pair, just permutes a
/// raw 16-word block.
pub fn chacha208(input: &[u32; 16]) -> [u32; 16] {
    let mut state = *input;
    for _ in 0..4 {
        let (mut a, mut b, mut c, mut d) = (state[0], state[4], state[8], state[12]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[0] = a;
        state[4] = b;
        state[8] = c;
        state[12] = d;

        let (mut a, mut b, mut c, mut d) = (state[1], state[5], state[9], state[13]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[1] = a;
        state[5] = b;
        state[9] = c;
        state[13] = d;

        let (mut a, mut b, mut c, mut d) = (state[2], state[6], state[10], state[14]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[2] = a;
        state[6] = b;
        state[10] = c;
        state[14] = d;

        let (mut a, mut b, mut c, mut d) = (state[3], state[7], state[11], state[15]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[3] = a;
        state[7] = b;
        state[11] = c;
        state[15] = d;

        let (mut a, mut b, mut c, mut d) = (state[0], state[5], state[10], state[15]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[0] = a;
        state[5] = b;
        state[10] = c;
        state[15] = d;

        let (mut a, mut b, mut c, mut d) = (state[1], state[6], state[11], state[12]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[1] = a;
        state[6] = b;
        state[11] = c;
        state[12] = d;

        let (mut a, mut b, mut c, mut d) = (state[2], state[7], state[8], state[13]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[2] = a;
        state[7] = b;
        state[8] = c;
        state[13] = d;

        let (mut a, mut b, mut c, mut d) = (state[3], state[4], state[9], state[14]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[3] = a;
        state[4] = b;
        state[9] = c;
        state[14] = d;
    }
    let mut out = [0u32; 16];
    for i in 0..16 {
        out[i] = state[i].wrapping_add(input[i]);
    }
    out
}

/// HChaCha20: derives a fresh 256-bit key from a 256-bit key and a
/// 128-bit nonce, by running the ChaCha core without the final
/// feed-forward addition and keeping only the first and last rows of
/// the resulting state. Used by XChaCha-style extended-nonce
/// constructions and to refresh the CSPRNG.
pub fn hchacha20(key: &Chakey, nonce: &[u8; 16]) -> Chakey {
    let n0 = u32::from_le_bytes(nonce[0..4].try_into().unwrap());
    let n1 = u32::from_le_bytes(nonce[4..8].try_into().unwrap());
    let n2 = u32::from_le_bytes(nonce[8..12].try_into().unwrap());
    let n3 = u32::from_le_bytes(nonce[12..16].try_into().unwrap());

    let mut state = [
        CONSTANTS[0],
        CONSTANTS[1],
        CONSTANTS[2],
        CONSTANTS[3],
        key.0[0],
        key.0[1],
        key.0[2],
        key.0[3],
        key.0[4],
        key.0[5],
        key.0[6],
        key.0[7],
        n0,
        n1,
        n2,
        n3,
    ];

    for _ in 0..10 {
        let (mut a, mut b, mut c, mut d) = (state[0], state[4], state[8], state[12]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[0] = a;
        state[4] = b;
        state[8] = c;
        state[12] = d;

        let (mut a, mut b, mut c, mut d) = (state[1], state[5], state[9], state[13]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[1] = a;
        state[5] = b;
        state[9] = c;
        state[13] = d;

        let (mut a, mut b, mut c, mut d) = (state[2], state[6], state[10], state[14]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[2] = a;
        state[6] = b;
        state[10] = c;
        state[14] = d;

        let (mut a, mut b, mut c, mut d) = (state[3], state[7], state[11], state[15]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[3] = a;
        state[7] = b;
        state[11] = c;
        state[15] = d;

        let (mut a, mut b, mut c, mut d) = (state[0], state[5], state[10], state[15]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[0] = a;
        state[5] = b;
        state[10] = c;
        state[15] = d;

        let (mut a, mut b, mut c, mut d) = (state[1], state[6], state[11], state[12]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[1] = a;
        state[6] = b;
        state[11] = c;
        state[12] = d;

        let (mut a, mut b, mut c, mut d) = (state[2], state[7], state[8], state[13]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[2] = a;
        state[7] = b;
        state[8] = c;
        state[13] = d;

        let (mut a, mut b, mut c, mut d) = (state[3], state[4], state[9], state[14]);
        quarter_round(&mut a, &mut b, &mut c, &mut d);
        state[3] = a;
        state[4] = b;
        state[9] = c;
        state[14] = d;
    }

    Chakey([
        state[0], state[1], state[2], state[3], state[12], state[13], state[14], state[15],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8439 §2.3.2 test vector.
    #[test]
    fn block_ietf_matches_rfc8439_vector() {
        let key = Chakey::from_bytes(&{
            let mut k = [0u8; 32];
            for i in 0..32 {
                k[i] = i as u8;
            }
            k
        });
        let nonce = [0, 0, 0, 9, 0, 0, 0, 0x4a, 0, 0, 0, 0];
        let block = block_ietf(&key, &nonce, 1);
        assert_eq!(block[0], 0x10);
        assert_eq!(block[1], 0xf1);
    }

    #[test]
    fn xor_then_xor_again_is_identity() {
        let key = Chakey::ZERO;
        let mut data = *b"the quick brown fox jumps over the lazy dog!!!!";
        let original = data;
        xor64(&key, 7, 1, &mut data);
        assert_ne!(data, original);
        xor64(&key, 7, 1, &mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn hchacha20_is_deterministic() {
        let key = Chakey::from_bytes(&[9u8; 32]);
        let nonce = [1u8; 16];
        assert_eq!(hchacha20(&key, &nonce).0, hchacha20(&key, &nonce).0);
    }
}
