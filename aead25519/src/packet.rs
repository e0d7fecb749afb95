//! The header-prefixed packet format: `leb128(u) || payload || filler`,
//! encrypted as a single multi-recipient AEAD record. `u` is an
//! application-chosen routing tag (e.g. a packet-type discriminant)
//! that [`peek_head`] can recover without verifying the record's tags,
//! so a router can dispatch a packet before the (possibly expensive)
//! full decrypt-and-authenticate.
//!
//! [`peek_head`]'s result MUST NOT be trusted for anything beyond
//! routing: an attacker who cannot forge a tag can still flip ciphertext
//! bits that land in the header, since nothing has been authenticated
//! yet at that point.

use symmetric25519::chacha20::{self, Chakey};

use crate::errors::AeadError;
use crate::multi::{decrypt_multi, encrypt_multi};

const MAX_LEB128_LEN: usize = 10; // ceil(64 / 7)

fn leb128_encode(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_LEB128_LEN);
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
    out
}

/// Decodes a LEB128 `u64` from the front of `bytes`, returning the value
/// and the number of bytes consumed.
fn leb128_decode(bytes: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0u32;
    for (i, &byte) in bytes.iter().take(MAX_LEB128_LEN).enumerate() {
        value |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
        shift += 7;
    }
    None
}

/// Builds `leb128(u) || payload || filler` (filler is all-zero
/// plaintext, so its ciphertext is exactly keystream bytes) and encrypts
/// it as one multi-recipient AEAD record.
pub fn encrypt_packet(
    k_e: &Chakey,
    nonce: u64,
    ad: &[u8],
    u: u64,
    payload: &[u8],
    pad_len: usize,
    k_a: &[Chakey],
) -> Vec<u8> {
    let mut plaintext = leb128_encode(u);
    plaintext.extend_from_slice(payload);
    plaintext.extend(core::iter::repeat(0u8).take(pad_len));
    encrypt_multi(k_e, nonce, ad, &plaintext, k_a)
}

/// Decrypts a record built by [`encrypt_packet`]. `payload_len` must be
/// supplied by the caller (the filler carries no length of its own);
/// returns `(u, payload)`.
pub fn decrypt_packet(
    k_e: &Chakey,
    nonce: u64,
    ad: &[u8],
    record: &[u8],
    k_a: &Chakey,
    ika: usize,
    num_recipients: usize,
    payload_len: usize,
) -> Result<(u64, Vec<u8>), AeadError> {
    let plaintext = decrypt_multi(k_e, nonce, ad, record, k_a, ika, num_recipients)?;
    let (u, leb_len) = leb128_decode(&plaintext).ok_or(AeadError::ShortInput)?;
    if plaintext.len() < leb_len + payload_len {
        return Err(AeadError::ShortInput);
    }
    let payload = plaintext[leb_len..leb_len + payload_len].to_vec();
    Ok((u, payload))
}

/// Peeks the packet's LEB128 header `u` without verifying any tag: xors
/// the first up-to-10 ciphertext bytes with the matching ChaCha20
/// keystream bytes (block 1, same as the real decrypt's stream) and
/// parses a LEB128 value. The caller MUST treat the result as untrusted
/// routing information only.
pub fn peek_head(k_e: &Chakey, nonce: u64, record: &[u8]) -> Option<u64> {
    let peek_len = core::cmp::min(MAX_LEB128_LEN, record.len());
    let mut buf = record[..peek_len].to_vec();
    chacha20::xor64(k_e, nonce, 1, &mut buf);
    leb128_decode(&buf).map(|(u, _)| u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leb128_round_trips_small_and_large_values() {
        for v in [0u64, 1, 127, 128, 300, u64::MAX] {
            let encoded = leb128_encode(v);
            let (decoded, len) = leb128_decode(&encoded).unwrap();
            assert_eq!(decoded, v);
            assert_eq!(len, encoded.len());
        }
    }

    #[test]
    fn packet_round_trips() {
        let k_e = Chakey::from_bytes(&[1u8; 32]);
        let k_a = Chakey::from_bytes(&[2u8; 32]);
        let payload = b"payload bytes";

        let record = encrypt_packet(&k_e, 1, b"ad", 42, payload, 8, &[k_a.clone()]);
        let (u, recovered) = decrypt_packet(&k_e, 1, b"ad", &record, &k_a, 0, 1, payload.len()).unwrap();

        assert_eq!(u, 42);
        assert_eq!(recovered, payload);
    }

    #[test]
    fn peek_head_recovers_u_without_authenticating() {
        let k_e = Chakey::from_bytes(&[3u8; 32]);
        let k_a = Chakey::from_bytes(&[4u8; 32]);

        let record = encrypt_packet(&k_e, 9, b"", 1000, b"x", 0, &[k_a.clone()]);
        let peeked = peek_head(&k_e, 9, &record).unwrap();
        assert_eq!(peeked, 1000);
    }

    #[test]
    fn tampered_payload_fails_full_decrypt_even_if_header_peeks_fine() {
        let k_e = Chakey::from_bytes(&[5u8; 32]);
        let k_a = Chakey::from_bytes(&[6u8; 32]);

        let mut record = encrypt_packet(&k_e, 1, b"", 7, b"payload!", 0, &[k_a.clone()]);
        let peeked = peek_head(&k_e, 1, &record).unwrap();
        assert_eq!(peeked, 7);

        let last = record.len() - 1;
        record[last] ^= 1;
        assert!(decrypt_packet(&k_e, 1, b"", &record, &k_a, 0, 1, 8).is_err());
    }
}
