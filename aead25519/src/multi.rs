//! Multi-recipient ChaCha20-Poly1305: one ciphertext, `n` independent
//! per-recipient tags, each keyed off a distinct keystream block so that
//! even two identical `k_a` keys produce distinct tags (see
//! [`encrypt_multi`]'s block-index choice).
//!
//! Wire layout of one record: `ciphertext[mlen] || tag_0[16] || tag_1[16]
//! || ... || tag_{n-1}[16]`.

use subtle::{Choice, ConstantTimeEq};
use symmetric25519::chacha20::{self, Chakey};
use symmetric25519::poly1305;

use crate::errors::AeadError;

/// Encrypts `m` for `n = k_a.len()` recipients under encryption key
/// `k_e` and nonce `n`, with associated data `ad` authenticated but not
/// encrypted. Returns `ciphertext || tag_0 || ... || tag_{n-1}`.
pub fn encrypt_multi(k_e: &Chakey, nonce: u64, ad: &[u8], m: &[u8], k_a: &[Chakey]) -> Vec<u8> {
    assert!(!k_a.is_empty(), "multi-recipient AEAD needs at least one recipient key");

    let mut c = m.to_vec();
    chacha20::xor64(k_e, nonce, 1, &mut c);

    let mut out = Vec::with_capacity(c.len() + 16 * k_a.len());
    out.extend_from_slice(&c);

    for (i, k_ai) in k_a.iter().enumerate() {
        let tag = recipient_tag(k_ai, nonce, i, ad, &c, m.len());
        out.extend_from_slice(&tag);
    }

    out
}

/// Decrypts a record produced by [`encrypt_multi`] as recipient `ika`
/// (zero-indexed) out of `num_recipients` total tags appended after the
/// ciphertext. Verifies only recipient `ika`'s tag; a forged tag for a
/// different recipient index does not affect this call.
pub fn decrypt_multi(
    k_e: &Chakey,
    nonce: u64,
    ad: &[u8],
    record: &[u8],
    k_a: &Chakey,
    ika: usize,
    num_recipients: usize,
) -> Result<Vec<u8>, AeadError> {
    let tags_len = 16 * num_recipients;
    if record.len() < tags_len || ika >= num_recipients {
        return Err(AeadError::ShortInput);
    }
    let mlen = record.len() - tags_len;
    let c = &record[..mlen];
    let tag_offset = mlen + ika * 16;
    let received_tag = &record[tag_offset..tag_offset + 16];

    let expected_tag = recipient_tag(k_a, nonce, ika, ad, c, mlen);
    let ok: Choice = expected_tag.ct_eq(received_tag);
    if !bool::from(ok) {
        return Err(AeadError::BadTag);
    }

    let mut m = c.to_vec();
    chacha20::xor64(k_e, nonce, 1, &mut m);
    Ok(m)
}

/// Recipient `i`'s Poly1305 tag over `ad || pad16(ad) || c || pad16(c) ||
/// le64(alen) || le64(clen)`, keyed by the first 32 bytes of
/// `ChaCha20(k_a, nonce, block = -i)`. The negative block index is what
/// decorrelates recipient `i`'s tag from recipient `0`'s even when their
/// `k_a` happen to coincide.
fn recipient_tag(k_a: &Chakey, nonce: u64, i: usize, ad: &[u8], c: &[u8], clen: usize) -> [u8; 16] {
    let block = chacha20::block64(k_a, nonce, -(i as i64));
    let mut poly_key = [0u8; 32];
    poly_key.copy_from_slice(&block[0..32]);

    let mut ctx = poly1305::Context::new(&poly_key);
    ctx.update(ad);
    poly1305::pad16(&mut ctx, ad.len());
    ctx.update(c);
    poly1305::pad16(&mut ctx, clen);
    ctx.update_u64_le(ad.len() as u64);
    ctx.update_u64_le(clen as u64);
    ctx.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_recipient_round_trips() {
        let k_e = Chakey::ZERO;
        let k_a = Chakey::ZERO;
        let m = b"hello";

        let record = encrypt_multi(&k_e, 1, b"", m, &[k_a.clone()]);
        assert_eq!(record.len(), m.len() + 16);

        let decrypted = decrypt_multi(&k_e, 1, b"", &record, &k_a, 0, 1).unwrap();
        assert_eq!(decrypted, m);
    }

    /// Scenario 3 from the testable-properties list: two recipients
    /// sharing all-zero `k_e`/`k_a` keys still get distinct tags, and
    /// both independently decrypt.
    #[test]
    fn two_recipients_with_identical_keys_get_distinct_tags() {
        let k_e = Chakey::ZERO;
        let k_a0 = Chakey::ZERO;
        let k_a1 = Chakey::ZERO;
        let m = b"hello";

        let record = encrypt_multi(&k_e, 1, b"", m, &[k_a0.clone(), k_a1.clone()]);
        assert_eq!(record.len(), m.len() + 32);

        let tag0 = &record[m.len()..m.len() + 16];
        let tag1 = &record[m.len() + 16..m.len() + 32];
        assert_ne!(tag0, tag1);

        assert_eq!(decrypt_multi(&k_e, 1, b"", &record, &k_a0, 0, 2).unwrap(), m);
        assert_eq!(decrypt_multi(&k_e, 1, b"", &record, &k_a1, 1, 2).unwrap(), m);
    }

    #[test]
    fn flipping_one_recipients_tag_only_breaks_that_recipient() {
        let k_e = Chakey::ZERO;
        let k_a0 = Chakey::ZERO;
        let k_a1 = Chakey::ZERO;
        let m = b"hello";

        let mut record = encrypt_multi(&k_e, 1, b"", m, &[k_a0.clone(), k_a1.clone()]);
        let last = record.len() - 1;
        record[last] ^= 1;

        assert!(decrypt_multi(&k_e, 1, b"", &record, &k_a1, 1, 2).is_err());
        assert_eq!(decrypt_multi(&k_e, 1, b"", &record, &k_a0, 0, 2).unwrap(), m);
    }

    #[test]
    fn flipping_ciphertext_byte_breaks_all_recipients() {
        let k_e = Chakey::ZERO;
        let k_a = Chakey::from_bytes(&[9u8; 32]);
        let m = b"hello world";

        let mut record = encrypt_multi(&k_e, 1, b"", m, &[k_a.clone()]);
        record[0] ^= 1;

        assert!(decrypt_multi(&k_e, 1, b"", &record, &k_a, 0, 1).is_err());
    }

    #[test]
    fn flipping_ad_breaks_decryption() {
        let k_e = Chakey::ZERO;
        let k_a = Chakey::from_bytes(&[1u8; 32]);
        let m = b"hello world";

        let record = encrypt_multi(&k_e, 1, b"context", m, &[k_a.clone()]);
        assert!(decrypt_multi(&k_e, 1, b"context!", &record, &k_a, 0, 1).is_err());
    }
}
