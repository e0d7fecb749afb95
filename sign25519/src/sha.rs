//! The Ristretto255 signature variant: the signing scalar is used
//! directly (no clamping -- Ristretto's prime-order group has no
//! cofactor to clear), `R` and `A` are encoded with the Ristretto255
//! canonical encoding rather than `mxs`, and hashing/domain-separation
//! follow the same `prefix || 0x00` convention as [`crate::bmx`].
//!
//! A qDSA-style third verification path, [`verify_qdsa`], is also
//! provided: it checks the same relation using only Montgomery
//! `u`-coordinates and the ladder, never decoding a Ristretto point to
//! affine form. Since the signature is produced and normally verified in
//! the Ristretto group, checking it on the Montgomery curve first lifts
//! every scalar and point to its coset's order-`8l` representative (by
//! multiplying every scalar, and the point `R`, by 8): the ladder no
//! longer needs the missing Ristretto-specific square-root convention to
//! agree with a plain Montgomery point, only the underlying curve
//! arithmetic, which `curverify_mont`'s biquadratic identity checks
//! directly.
use curve25519_core::scalar::Scalar;
use curve25519_core::{CompressedRistretto, RistrettoPoint};
use symmetric25519::blake2b;

use crate::errors::SignError;

fn domain_hash(prefix: Option<&str>, parts: &[&[u8]]) -> [u8; 64] {
    let mut ctx = blake2b::Context::new(64);
    if let Some(p) = prefix {
        ctx.update(p.as_bytes());
        ctx.update(&[0u8]);
    }
    for part in parts {
        ctx.update(part);
    }
    ctx.finalize()
}

/// Derives the signing scalar and its hash prefix directly from the
/// secret bytes: Ristretto scalars are used as-is, reduced mod `l`, with
/// no X25519-style clamping.
fn expand_secret(secret: &[u8; 32]) -> (Scalar, [u8; 32]) {
    let a = Scalar::from_bytes_mod_order(secret);
    let prefix = blake2b::hash(a.as_bytes(), 32);
    let mut out = [0u8; 32];
    out.copy_from_slice(&prefix);
    (a, out)
}

/// The public key (Ristretto255 canonical encoding) matching `secret`.
pub fn public_key(secret: &[u8; 32]) -> [u8; 32] {
    let (a, _) = expand_secret(secret);
    let a_point = RistrettoPoint::basepoint().mul(&a);
    *a_point.compress().as_bytes()
}

/// Signs `m` under `secret`, with domain-separation string `prefix`.
pub fn sign(prefix: Option<&str>, secret: &[u8; 32], m: &[u8]) -> [u8; 64] {
    let (a, hash_prefix) = expand_secret(secret);
    let a_bytes = *RistrettoPoint::basepoint().mul(&a).compress().as_bytes();

    let r = Scalar::from_bytes_mod_order_wide(&domain_hash(prefix, &[&hash_prefix, m]));
    let r_bytes = *RistrettoPoint::basepoint().mul(&r).compress().as_bytes();

    let h = Scalar::from_bytes_mod_order_wide(&domain_hash(prefix, &[&r_bytes, &a_bytes, m]));
    let s = r.add(&h.mul(&a));

    let mut sig = [0u8; 64];
    sig[0..32].copy_from_slice(&r_bytes);
    sig[32..64].copy_from_slice(s.as_bytes());
    sig
}

/// Verifies a signature produced by [`sign`] against the Ristretto255
/// public key `public_ris`.
pub fn verify(prefix: Option<&str>, public_ris: &[u8; 32], m: &[u8], sig: &[u8; 64]) -> Result<(), SignError> {
    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&sig[32..64]);
    let s = Scalar::from_canonical_bytes(s_bytes).ok_or(SignError::BadScalar)?;

    let a = CompressedRistretto(*public_ris)
        .decompress()
        .map_err(|_| SignError::BadPoint)?;

    let h = Scalar::from_bytes_mod_order_wide(&domain_hash(prefix, &[&sig[0..32], public_ris, m]));

    let r_prime = RistrettoPoint::basepoint().mul(&s).sub(&a.mul(&h));

    if r_prime.compress().as_bytes() == &sig[0..32] {
        Ok(())
    } else {
        Err(SignError::BadSignature)
    }
}

/// `ristretto_qdsa_verify`: the Montgomery-ladder-only verification path
/// described in the module docs. Re-derives `h` exactly as [`verify`]
/// does, then checks the lifted relation `8*R == 8*s*B - 8*h*A` with
/// [`curve25519_core::qdsa::curverify_mont`] instead of reconstructing
/// affine Ristretto points.
pub fn verify_qdsa(prefix: Option<&str>, public_ris: &[u8; 32], m: &[u8], sig: &[u8; 64]) -> Result<(), SignError> {
    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&sig[32..64]);
    let s = Scalar::from_canonical_bytes(s_bytes).ok_or(SignError::BadScalar)?;

    let a = CompressedRistretto(*public_ris)
        .decompress()
        .map_err(|_| SignError::BadPoint)?;
    let mut r_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&sig[0..32]);
    let r = CompressedRistretto(r_bytes)
        .decompress()
        .map_err(|_| SignError::BadPoint)?;

    let h = Scalar::from_bytes_mod_order_wide(&domain_hash(prefix, &[&sig[0..32], public_ris, m]));

    let eight = Scalar::from_bits_unreduced([
        8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ]);

    let a_mont = a.to_montgomery();
    let r_mont = r.to_montgomery().ladder(&eight);
    let h8 = h.times_eight();
    let s8 = s.times_eight();

    if curve25519_core::curverify_mont(&r_mont, &a_mont, &h8, &s8) {
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
        let secret = [8u8; 32];
        let pk = public_key(&secret);
        let sig = sign(Some("sha-test"), &secret, b"hello, sha");
        assert!(verify(Some("sha-test"), &pk, b"hello, sha", &sig).is_ok());
    }

    #[test]
    fn tampered_signature_fails() {
        let secret = [9u8; 32];
        let pk = public_key(&secret);
        let mut sig = sign(Some("p"), &secret, b"m");
        sig[0] ^= 1;
        assert!(verify(Some("p"), &pk, b"m", &sig).is_err());
    }

    #[test]
    fn mismatched_domain_prefix_fails() {
        let secret = [10u8; 32];
        let pk = public_key(&secret);
        let sig = sign(Some("a"), &secret, b"m");
        assert!(verify(Some("b"), &pk, b"m", &sig).is_err());
    }

    #[test]
    fn qdsa_path_accepts_a_genuine_signature() {
        let secret = [11u8; 32];
        let pk = public_key(&secret);
        let sig = sign(Some("qdsa-test"), &secret, b"hello, qdsa");
        assert!(verify_qdsa(Some("qdsa-test"), &pk, b"hello, qdsa", &sig).is_ok());
    }

    #[test]
    fn qdsa_path_rejects_a_tampered_signature() {
        let secret = [12u8; 32];
        let pk = public_key(&secret);
        let mut sig = sign(Some("qdsa-test"), &secret, b"m");
        sig[32] ^= 1;
        assert!(verify_qdsa(Some("qdsa-test"), &pk, b"m", &sig).is_err());
    }
}
