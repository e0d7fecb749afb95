// -*- mode: rust; -*-
//
// This file is part of curve25519-core.
// See LICENSE for licensing information.

//! The qDSA verification identity: confirms a relation among three curve
//! points using only their Montgomery `u`-coordinates and the ladder,
//! without ever reconstructing a signed Edwards point.
//!
//! Montgomery encodings carry no sign: `u(P) == u(-P)`. For points
//! `P1, P2, P3` with `u`-coordinates `u1, u2, u3`, the biquadratic
//! identity
//!
//! `4*(u1+u2+u3+A)*(u1*u2*u3) = (1 - u1*u2 - u2*u3 - u3*u1)^2`
//!
//! holds exactly when some choice of signs makes `P1 + e2*P2 + e3*P3`
//! the identity. Signature verification packages "does `R == s*B - h*A`"
//! as exactly that question, with `u1 = u(R)`, `u2 = u(h*A)`,
//! `u3 = u(s*B)`: the sign ambiguity the identity tolerates is precisely
//! the ambiguity a Montgomery encoding already has, so nothing is lost.

use crate::constants;
use crate::field::FieldElement;
use crate::montgomery::MontgomeryPoint;
use crate::scalar::Scalar;

/// Evaluates the identity above. Variable-time: every input here is a
/// public value (signature components and a public key), never a secret
/// scalar.
pub fn biquadratic_holds(u1: &FieldElement, u2: &FieldElement, u3: &FieldElement) -> bool {
    let a = constants::montgomery_a();
    let four = FieldElement::ONE.add(&FieldElement::ONE).square();

    let sum = u1.add(u2).add(u3).add(&a);
    let prod = u1.mul(u2).mul(u3);
    let lhs = four.mul(&sum).mul(&prod);

    let pairwise = u1.mul(u2).add(&u2.mul(u3)).add(&u3.mul(u1));
    let rhs = FieldElement::ONE.sub(&pairwise).square();

    lhs.as_bytes() == rhs.as_bytes()
}

/// `curverify_mont`: verifies that `r_u == s*B - h*a_u` (up to the sign
/// ambiguity a Montgomery `u`-coordinate cannot resolve), computing only
/// two ladder multiplications and never decoding to Edwards form. This is
/// the qDSA-style third verification path for the `bmx` signature scheme:
/// the usual [`crate::scalar_mul::vartime_double_base`]-based verify
/// reconstructs `a_u`'s Edwards point and needs its sign bit out-of-band;
/// this one needs only the two plain Montgomery `u`-coordinates.
pub fn curverify_mont(r_u: &MontgomeryPoint, a_u: &MontgomeryPoint, h: &Scalar, s: &Scalar) -> bool {
    let u1 = r_u.to_field();
    let u2 = a_u.ladder(h).to_field();
    let u3 = MontgomeryPoint::basepoint().ladder(s).to_field();
    biquadratic_holds(&u1, &u2, &u3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edwards::EdwardsPoint;

    #[test]
    fn biquadratic_holds_for_a_genuine_sum_to_identity() {
        // R + h*A - s*B = O for s = h*a (taking R = identity, A = a*B).
        let a = Scalar::from_bytes_mod_order(&[11u8; 32]);
        let h = Scalar::from_bytes_mod_order(&[22u8; 32]);
        let s = h.mul(&a);

        let a_point: MontgomeryPoint = (&EdwardsPoint::basepoint()).into();
        let a_point = a_point.ladder(&a);
        let r_u = MontgomeryPoint([0u8; 32]); // u-coordinate of the identity is 0

        assert!(curverify_mont(&r_u, &a_point, &h, &s));
    }

    #[test]
    fn biquadratic_rejects_an_unrelated_triple() {
        let a_point: MontgomeryPoint = (&EdwardsPoint::basepoint()).into();
        let a_point = a_point.ladder(&Scalar::from_bytes_mod_order(&[3u8; 32]));
        let r_u: MontgomeryPoint = (&EdwardsPoint::basepoint()).into();
        let r_u = r_u.ladder(&Scalar::from_bytes_mod_order(&[5u8; 32]));

        let h = Scalar::from_bytes_mod_order(&[9u8; 32]);
        let s = Scalar::from_bytes_mod_order(&[13u8; 32]);

        assert!(!curverify_mont(&r_u, &a_point, &h, &s));
    }

    #[test]
    fn matches_a_real_bmx_style_relation() {
        // R = r*B, A = a*B, h arbitrary, s = r + h*a mod l: then
        // R == s*B - h*A exactly, so the identity must hold.
        let r = Scalar::from_bytes_mod_order(&[2u8; 32]);
        let a = Scalar::from_bytes_mod_order(&[4u8; 32]);
        let h = Scalar::from_bytes_mod_order(&[6u8; 32]);
        let s = r.add(&h.mul(&a));

        let base: MontgomeryPoint = (&EdwardsPoint::basepoint()).into();
        let r_point = base.ladder(&r);
        let a_point = base.ladder(&a);

        assert!(curverify_mont(&r_point, &a_point, &h, &s));
    }
}
