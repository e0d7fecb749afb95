//! The Ed25519-compatible signature variant: seed expansion via SHA-512,
//! Edwards-y-with-sign `R`/`A` encoding, no domain-separation prefix. Bit
//! for bit interoperable with RFC 8032.

use curve25519_core::scalar_mul::variable_base;
use curve25519_core::scalar_mul::vartime_double_base;
use curve25519_core::{CompressedEdwardsY, EdwardsPoint, Scalar};
use symmetric25519::sha2::sha512;

use crate::errors::SignError;

/// `ed25519_seed_to_scalar`/`ed25519_seed_to_ey`: expands a 32-byte seed
/// into the clamped signing scalar `a` and the 32-byte hash prefix used
/// to derive the per-message nonce `r`.
fn expand_seed(seed: &[u8; 32]) -> (Scalar, [u8; 32]) {
    let h = sha512(seed);
    let mut scalar_bytes = [0u8; 32];
    scalar_bytes.copy_from_slice(&h[0..32]);
    let a = Scalar::from_clamped_bytes(scalar_bytes);
    let mut prefix = [0u8; 32];
    prefix.copy_from_slice(&h[32..64]);
    (a, prefix)
}

/// The public key matching a 32-byte seed.
pub fn public_key(seed: &[u8; 32]) -> [u8; 32] {
    let (a, _) = expand_seed(seed);
    *variable_base::mul_base(&a).compress().as_bytes()
}

/// Signs `m` with the expanded seed, returning `R || S`.
pub fn sign(seed: &[u8; 32], m: &[u8]) -> [u8; 64] {
    let (a, hash_prefix) = expand_seed(seed);
    let a_compressed = variable_base::mul_base(&a).compress();

    let mut r_input = Vec::with_capacity(32 + m.len());
    r_input.extend_from_slice(&hash_prefix);
    r_input.extend_from_slice(m);
    let r = Scalar::from_bytes_mod_order_wide(&sha512(&r_input));

    let r_point = variable_base::mul_base(&r);
    let r_compressed = r_point.compress();

    let mut hram_input = Vec::with_capacity(64 + m.len());
    hram_input.extend_from_slice(r_compressed.as_bytes());
    hram_input.extend_from_slice(a_compressed.as_bytes());
    hram_input.extend_from_slice(m);
    let h = Scalar::from_bytes_mod_order_wide(&sha512(&hram_input));

    let s = r.add(&h.mul(&a));

    let mut sig = [0u8; 64];
    sig[0..32].copy_from_slice(r_compressed.as_bytes());
    sig[32..64].copy_from_slice(s.as_bytes());
    sig
}

/// Verifies a signature produced by [`sign`] against public key `a_bytes`.
pub fn verify(a_bytes: &[u8; 32], m: &[u8], sig: &[u8; 64]) -> Result<(), SignError> {
    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&sig[32..64]);
    let s = Scalar::from_canonical_bytes(s_bytes).ok_or(SignError::BadScalar)?;

    let a = CompressedEdwardsY(*a_bytes)
        .decompress()
        .map_err(|_| SignError::BadPoint)?;
    let neg_a = a.negate();

    let mut hram_input = Vec::with_capacity(64 + m.len());
    hram_input.extend_from_slice(&sig[0..32]);
    hram_input.extend_from_slice(a_bytes);
    hram_input.extend_from_slice(m);
    let h = Scalar::from_bytes_mod_order_wide(&sha512(&hram_input));

    let r_prime: EdwardsPoint = vartime_double_base::mul(&h, &neg_a, &s);
    let r_prime_compressed = r_prime.compress();

    if r_prime_compressed.as_bytes() == &sig[0..32] {
        Ok(())
    } else {
        Err(SignError::BadSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let seed = [7u8; 32];
        let pk = public_key(&seed);
        let sig = sign(&seed, b"hello, sey");
        assert!(verify(&pk, b"hello, sey", &sig).is_ok());
    }

    #[test]
    fn tampered_message_fails_verification() {
        let seed = [1u8; 32];
        let pk = public_key(&seed);
        let sig = sign(&seed, b"original message");
        assert!(verify(&pk, b"different message", &sig).is_err());
    }

    /// RFC 8032 §7.1 test vector 1.
    #[test]
    fn rfc8032_vector_one() {
        let seed: [u8; 32] =
            hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
                .unwrap()
                .try_into()
                .unwrap();
        let expected_pk =
            hex::decode("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a")
                .unwrap();
        let expected_sig = hex::decode(
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b",
        )
        .unwrap();

        let pk = public_key(&seed);
        assert_eq!(&pk[..], &expected_pk[..]);

        let sig = sign(&seed, b"");
        assert_eq!(&sig[..], &expected_sig[..]);
        assert!(verify(&pk, b"", &sig).is_ok());
    }
}
