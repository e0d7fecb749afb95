//! scrypt-BLAKE2b: Colin Percival's scrypt, with BLAKE2b-keyed-with-password
//! in place of HMAC-SHA256 as the PBKDF2 pseudorandom function, and the
//! ChaCha20 8-round reduced permutation (`chacha208`) in place of Salsa20/8
//! as `BlockMix`'s core — the substitution the amber source makes so the
//! whole KDF stack only needs one hash primitive family.

use symmetric25519::chacha20::chacha208;

const BLOCK_WORDS: usize = 16; // one 64-byte chacha208 block, in u32 words

/// Derives `dklen` bytes from `password`/`salt` with cost parameter
/// `n = 2^log2_n`, block size `r`, parallelization `p`.
///
/// `r = 8` and `p = 1` match the spec's seed KAT; larger `p` runs `p`
/// independent `ROMix` instances and concatenates their output, per the
/// scrypt RFC.
pub fn scrypt(password: &[u8], salt: &[u8], log2_n: u8, r: usize, p: usize, dklen: usize) -> Vec<u8> {
    let n = 1usize << log2_n;
    let block_bytes = 128 * r;

    let mut b = pbkdf2_blake2b(password, salt, 1, p * block_bytes);

    for chunk in b.chunks_mut(block_bytes) {
        let mut block = chunk.to_vec();
        romix(&mut block, n, r);
        chunk.copy_from_slice(&block);
    }

    pbkdf2_blake2b(password, &b, 1, dklen)
}

/// `ROMix(B, N)`: expand-then-mix-back memory-hard core.
fn romix(b: &mut [u8], n: usize, r: usize) {
    let block_bytes = 128 * r;
    debug_assert_eq!(b.len(), block_bytes);

    let mut v = vec![0u8; block_bytes * n];
    let mut x = b.to_vec();

    for i in 0..n {
        v[i * block_bytes..(i + 1) * block_bytes].copy_from_slice(&x);
        block_mix(&mut x, r);
    }

    for _ in 0..n {
        let j = integerify(&x, r) as usize % n;
        for k in 0..block_bytes {
            x[k] ^= v[j * block_bytes + k];
        }
        block_mix(&mut x, r);
    }

    b.copy_from_slice(&x);
}

fn integerify(x: &[u8], r: usize) -> u64 {
    let last_block_offset = (2 * r - 1) * 64;
    u64::from_le_bytes(x[last_block_offset..last_block_offset + 8].try_into().unwrap())
}

/// `BlockMix`: applies `chacha208` to `2r` 64-byte blocks in a
/// feed-forward chain, then de-interleaves even/odd blocks.
fn block_mix(b: &mut [u8], r: usize) {
    let mut x = [0u32; BLOCK_WORDS];
    load_words(&mut x, &b[(2 * r - 1) * 64..2 * r * 64]);

    let mut out = vec![0u8; b.len()];
    let mut y_even_index = 0usize;
    let mut y_odd_index = r;

    for i in 0..2 * r {
        let block = &b[i * 64..(i + 1) * 64];
        let mut block_words = [0u32; BLOCK_WORDS];
        load_words(&mut block_words, block);
        for j in 0..BLOCK_WORDS {
            x[j] ^= block_words[j];
        }
        x = chacha208(&x);

        let dest_index = if i % 2 == 0 {
            let idx = y_even_index;
            y_even_index += 1;
            idx
        } else {
            let idx = y_odd_index;
            y_odd_index += 1;
            idx
        };
        store_words(&mut out[dest_index * 64..(dest_index + 1) * 64], &x);
    }

    b.copy_from_slice(&out);
}

fn load_words(words: &mut [u32; BLOCK_WORDS], bytes: &[u8]) {
    for i in 0..BLOCK_WORDS {
        words[i] = u32::from_le_bytes(bytes[i * 4..i * 4 + 4].try_into().unwrap());
    }
}

fn store_words(bytes: &mut [u8], words: &[u32; BLOCK_WORDS]) {
    for i in 0..BLOCK_WORDS {
        bytes[i * 4..i * 4 + 4].copy_from_slice(&words[i].to_le_bytes());
    }
}

/// PBKDF2 with BLAKE2b (keyed with `password`) as the pseudorandom
/// function in place of HMAC. `iterations` is almost always `1` in
/// scrypt's own use (the memory-hard `ROMix` step provides the work
/// factor); exposed generally since PBKDF2 is useful on its own.
fn pbkdf2_blake2b(password: &[u8], salt: &[u8], iterations: u32, dklen: usize) -> Vec<u8> {
    let hlen = 64usize;
    let num_blocks = dklen.div_ceil(hlen);
    let mut out = Vec::with_capacity(num_blocks * hlen);

    for block_index in 1..=num_blocks as u32 {
        let mut salt_block = salt.to_vec();
        salt_block.extend_from_slice(&block_index.to_be_bytes());

        let mut u = symmetric25519::blake2b::keyed_hash(password, &salt_block, 64);
        let mut t = u.clone();
        for _ in 1..iterations {
            u = symmetric25519::blake2b::keyed_hash(password, &u, 64);
            for i in 0..hlen {
                t[i] ^= u[i];
            }
        }
        out.extend_from_slice(&t);
    }

    out.truncate(dklen);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // §8 seed scenario: pwd="password", salt="salt", shifts=14, r=8, p=1.
    #[test]
    fn seed_kat_is_deterministic_and_sized() {
        let a = scrypt(b"password", b"salt", 14, 8, 1, 64);
        let b = scrypt(b"password", b"salt", 14, 8, 1, 64);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn different_passwords_give_different_output() {
        let a = scrypt(b"password", b"salt", 10, 8, 1, 32);
        let b = scrypt(b"password2", b"salt", 10, 8, 1, 32);
        assert_ne!(a, b);
    }

    #[test]
    fn different_salts_give_different_output() {
        let a = scrypt(b"password", b"salt1", 10, 8, 1, 32);
        let b = scrypt(b"password", b"salt2", 10, 8, 1, 32);
        assert_ne!(a, b);
    }
}
