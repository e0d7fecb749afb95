//! The Curve25519-native signature variant: the signing scalar IS the
//! clamped X25519 secret scalar, hashing is done with BLAKE2b, `R` and
//! `A` are encoded as Montgomery-u-with-Edwards-sign (`mxs`), and every
//! hash invocation is prefixed with a caller-chosen null-terminated
//! domain-separation string. The sign bit of `A` rides along in the high
//! bit of `S` rather than in `A`'s own 32-byte wire encoding, since a bmx
//! public key is an ordinary X25519 public key and callers may want to
//! use the two interchangeably.

use curve25519_core::scalar_mul::vartime_double_base;
use curve25519_core::{EdwardsPoint, MontgomeryPoint, Scalar};
use symmetric25519::blake2b;

use crate::errors::SignError;

/// `edwards_to_mxs`: the Montgomery `u`-coordinate with the sign of the
/// affine Edwards `x` in the top bit. [`EdwardsPoint::compress`] already
/// computes that same sign bit (it stores it alongside `y` for the
/// Edwards-y encoding); reuse it instead of re-deriving the affine `x`.
fn encode_mxs(p: &EdwardsPoint) -> [u8; 32] {
    let mont: MontgomeryPoint = p.into();
    let sign = p.compress().as_bytes()[31] >> 7;
    let mut bytes = *mont.as_bytes();
    bytes[31] |= sign << 7;
    bytes
}

/// Domain-separates a hash with `prefix || 0x00` when `prefix` is given,
/// per the null-terminated convention shared with [`crate::sha`].
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

/// Derives the clamped X25519 scalar and its BLAKE2b hash prefix from the
/// raw 32-byte secret. Unlike [`crate::sey`], there is no seed expansion:
/// the scalar itself is the secret key.
fn scalar_and_prefix(secret: &[u8; 32]) -> (Scalar, [u8; 32]) {
    let a = Scalar::from_clamped_bytes(*secret);
    let prefix = blake2b::hash(a.as_bytes(), 32);
    let mut out = [0u8; 32];
    out.copy_from_slice(&prefix);
    (a, out)
}

/// The public key (plain Montgomery `u`, no sign bit) matching `secret`.
pub fn public_key(secret: &[u8; 32]) -> [u8; 32] {
    let (a, _) = scalar_and_prefix(secret);
    let a_point = curve25519_core::scalar_mul::variable_base::mul_base(&a);
    let a_mont: MontgomeryPoint = (&a_point).into();
    *a_mont.as_bytes()
}

/// Signs `m` under `secret`, with domain-separation string `prefix`.
pub fn sign(prefix: Option<&str>, secret: &[u8; 32], m: &[u8]) -> [u8; 64] {
    let (a, hash_prefix) = scalar_and_prefix(secret);
    let a_point = curve25519_core::scalar_mul::variable_base::mul_base(&a);
    let a_mxs = encode_mxs(&a_point);
    let sign_a = a_mxs[31] >> 7;

    let r = Scalar::from_bytes_mod_order_wide(&domain_hash(prefix, &[&hash_prefix, m]));
    let r_point = curve25519_core::scalar_mul::variable_base::mul_base(&r);
    let r_mxs = encode_mxs(&r_point);

    let h = Scalar::from_bytes_mod_order_wide(&domain_hash(prefix, &[&r_mxs, &a_mxs[..31], &[a_mxs[31] & 0x7f], m]));
    let s = r.add(&h.mul(&a));

    let mut sig = [0u8; 64];
    sig[0..32].copy_from_slice(&r_mxs);
    sig[32..64].copy_from_slice(s.as_bytes());
    sig[63] |= sign_a << 7;
    sig
}

/// Verifies a signature produced by [`sign`] against the plain
/// (no-sign-bit) public key `public_mx`.
pub fn verify(prefix: Option<&str>, public_mx: &[u8; 32], m: &[u8], sig: &[u8; 64]) -> Result<(), SignError> {
    let sign_a = sig[63] >> 7;
    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&sig[32..64]);
    s_bytes[31] &= 0x7f;
    let s = Scalar::from_canonical_bytes(s_bytes).ok_or(SignError::BadScalar)?;

    let mut a_mxs = *public_mx;
    a_mxs[31] |= sign_a << 7;

    let a = MontgomeryPoint(a_mxs)
        .to_edwards(sign_a)
        .ok_or(SignError::BadPoint)?;
    let neg_a = a.negate();

    // `sign`'s hash input uses the plain (sign-bit-free) encoding of `A`,
    // matching what `public_key` returns; reproduce that exactly rather
    // than hashing `a_mxs`, which carries the sign bit in its top bit.
    let h = Scalar::from_bytes_mod_order_wide(&domain_hash(prefix, &[&sig[0..32], public_mx, m]));

    let r_prime: EdwardsPoint = vartime_double_base::mul(&h, &neg_a, &s);
    let r_prime_mxs = encode_mxs(&r_prime);

    if r_prime_mxs == sig[0..32] {
        Ok(())
    } else {
        Err(SignError::BadSignature)
    }
}

/// `curverify_mont`-based alternative to [`verify`]: checks the same
/// relation, `R == S*B - h*A`, using only Montgomery `u`-coordinates and
/// the ladder. Unlike [`verify`], this never needs `A`'s Edwards sign
/// bit at all (the bit riding in `sig[63]`'s high bit is ignored), since
/// a Montgomery `u`-coordinate cannot distinguish `A` from `-A` and the
/// qDSA identity is symmetric under that ambiguity regardless.
pub fn verify_qdsa(prefix: Option<&str>, public_mx: &[u8; 32], m: &[u8], sig: &[u8; 64]) -> Result<(), SignError> {
    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&sig[32..64]);
    s_bytes[31] &= 0x7f;
    let s = Scalar::from_canonical_bytes(s_bytes).ok_or(SignError::BadScalar)?;

    let mut r_mxs = [0u8; 32];
    r_mxs.copy_from_slice(&sig[0..32]);
    r_mxs[31] &= 0x7f;
    let r_point = MontgomeryPoint(r_mxs);

    let a_point = MontgomeryPoint(*public_mx);

    let h = Scalar::from_bytes_mod_order_wide(&domain_hash(prefix, &[&sig[0..32], public_mx, m]));

    if curve25519_core::curverify_mont(&r_point, &a_point, &h, &s) {
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
        let secret = [3u8; 32];
        let pk = public_key(&secret);
        let sig = sign(Some("test-protocol"), &secret, b"hello, bmx");
        assert!(verify(Some("test-protocol"), &pk, b"hello, bmx", &sig).is_ok());
    }

    #[test]
    fn mismatched_domain_prefix_fails() {
        let secret = [4u8; 32];
        let pk = public_key(&secret);
        let sig = sign(Some("protocol-a"), &secret, b"m");
        assert!(verify(Some("protocol-b"), &pk, b"m", &sig).is_err());
    }

    #[test]
    fn no_prefix_round_trips() {
        let secret = [5u8; 32];
        let pk = public_key(&secret);
        let sig = sign(None, &secret, b"no domain sep here");
        assert!(verify(None, &pk, b"no domain sep here", &sig).is_ok());
    }

    #[test]
    fn tampered_signature_fails() {
        let secret = [6u8; 32];
        let pk = public_key(&secret);
        let mut sig = sign(Some("p"), &secret, b"m");
        sig[0] ^= 1;
        assert!(verify(Some("p"), &pk, b"m", &sig).is_err());
    }
}
