//! The streaming layered format used to seal an entire file or pipe: a
//! sequence of fixed-size plaintext records, each independently sealed
//! with the multi-recipient AEAD, under nonces `1, 2, 3, …`. The final
//! (possibly short) record sets bit 63 of its nonce, turning "this is
//! the last record" into an AD-covered fact so truncating the stream is
//! detected rather than silently accepted.

use symmetric25519::chacha20::Chakey;

use crate::errors::AeadError;
use crate::multi::{decrypt_multi, encrypt_multi};

const LAST_RECORD_BIT: u64 = 1 << 63;

/// Seals `plaintext` as a sequence of `record_size`-byte records (the
/// final record may be shorter), each under nonce `1, 2, ...` with the
/// last record's nonce OR'd with [`LAST_RECORD_BIT`]. Returns the
/// concatenation of all sealed records; the caller is responsible for
/// framing them (e.g. a length prefix per record) when writing to a
/// byte stream, since AEAD records do not self-delimit.
pub fn seal_stream(
    k_e: &Chakey,
    ad: &[u8],
    plaintext: &[u8],
    record_size: usize,
    k_a: &[Chakey],
) -> Vec<Vec<u8>> {
    assert!(record_size > 0, "record_size must be positive");

    let chunks: Vec<&[u8]> = plaintext.chunks(record_size).collect();
    let chunks: Vec<&[u8]> = if chunks.is_empty() { vec![&[]] } else { chunks };
    let last_index = chunks.len() - 1;

    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut nonce = (i as u64) + 1;
            if i == last_index {
                nonce |= LAST_RECORD_BIT;
            }
            encrypt_multi(k_e, nonce, ad, chunk, k_a)
        })
        .collect()
}

/// Opens a sequence of records produced by [`seal_stream`]. `records`
/// must be presented in original order and in full: position `i` is
/// decrypted under nonce `i+1`, with bit 63 set only for the last
/// position, so a truncated or reordered `records` slice fails to
/// authenticate against the nonce the genuine last record was sealed
/// under.
pub fn open_stream(
    k_e: &Chakey,
    ad: &[u8],
    records: &[Vec<u8>],
    k_a: &Chakey,
    ika: usize,
    num_recipients: usize,
) -> Result<Vec<u8>, AeadError> {
    if records.is_empty() {
        return Err(AeadError::ShortInput);
    }

    let last_index = records.len() - 1;
    let mut out = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let mut nonce = (i as u64) + 1;
        let is_last = i == last_index;
        if is_last {
            nonce |= LAST_RECORD_BIT;
        }

        let plaintext = decrypt_multi(k_e, nonce, ad, record, k_a, ika, num_recipients)?;
        out.extend_from_slice(&plaintext);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_multiple_records() {
        let k_e = Chakey::from_bytes(&[1u8; 32]);
        let k_a = Chakey::from_bytes(&[2u8; 32]);
        let plaintext = b"the quick brown fox jumps over the lazy dog, repeatedly";

        let records = seal_stream(&k_e, b"file-id", plaintext, 8, &[k_a.clone()]);
        assert!(records.len() > 1);

        let recovered = open_stream(&k_e, b"file-id", &records, &k_a, 0, 1).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn round_trips_single_short_record() {
        let k_e = Chakey::from_bytes(&[3u8; 32]);
        let k_a = Chakey::from_bytes(&[4u8; 32]);
        let plaintext = b"short";

        let records = seal_stream(&k_e, b"", plaintext, 4096, &[k_a.clone()]);
        assert_eq!(records.len(), 1);

        let recovered = open_stream(&k_e, b"", &records, &k_a, 0, 1).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn truncating_the_stream_is_detected() {
        let k_e = Chakey::from_bytes(&[5u8; 32]);
        let k_a = Chakey::from_bytes(&[6u8; 32]);
        let plaintext = b"0123456789abcdef0123456789abcdef";

        let mut records = seal_stream(&k_e, b"", plaintext, 8, &[k_a.clone()]);
        records.pop();

        assert!(open_stream(&k_e, b"", &records, &k_a, 0, 1).is_err());
    }

    #[test]
    fn reordering_records_is_detected() {
        let k_e = Chakey::from_bytes(&[7u8; 32]);
        let k_a = Chakey::from_bytes(&[8u8; 32]);
        let plaintext = b"0123456789abcdef0123456789abcdef";

        let mut records = seal_stream(&k_e, b"", plaintext, 8, &[k_a.clone()]);
        records.swap(0, 1);

        assert!(open_stream(&k_e, b"", &records, &k_a, 0, 1).is_err());
    }

    #[test]
    fn empty_plaintext_seals_to_one_record() {
        let k_e = Chakey::from_bytes(&[9u8; 32]);
        let k_a = Chakey::from_bytes(&[10u8; 32]);

        let records = seal_stream(&k_e, b"", b"", 16, &[k_a.clone()]);
        assert_eq!(records.len(), 1);

        let recovered = open_stream(&k_e, b"", &records, &k_a, 0, 1).unwrap();
        assert!(recovered.is_empty());
    }
}
