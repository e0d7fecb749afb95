// -*- mode: rust; -*-
//
// This file is part of curve25519-core.
// See LICENSE for licensing information.

//! The Montgomery curve `v^2 = u^3 + 486662*u^2 + u`, used by X25519. Only
//! the `u`-coordinate is ever encoded; the ladder computes `n*u` without
//! ever needing `v` or a curve-point sign.

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

use crate::constants;
use crate::edwards::EdwardsPoint;
use crate::field::{self, FieldElement};
use crate::scalar::Scalar;

/// A compressed Montgomery `u`-coordinate, as used by X25519 public keys.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MontgomeryPoint(pub [u8; 32]);

/// Swaps `a` and `b` without branching on `choice`.
fn conditional_swap(a: &mut FieldElement, b: &mut FieldElement, choice: Choice) {
    let a_orig = *a;
    a.conditional_assign(b, choice);
    b.conditional_assign(&a_orig, choice);
}

impl MontgomeryPoint {
    /// The canonical base point's `u`-coordinate, `9`.
    pub const BASEPOINT_BYTES: [u8; 32] = [
        9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0,
    ];

    pub fn basepoint() -> MontgomeryPoint {
        MontgomeryPoint(Self::BASEPOINT_BYTES)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_field(&self) -> FieldElement {
        // X25519 (RFC 7748 §5) masks the top bit on decode and does not
        // reject non-canonical (`u >= p`) encodings: `from_bytes` already
        // reduces mod p, so an out-of-range encoding just aliases to its
        // residue rather than erroring.
        let mut bytes = self.0;
        bytes[31] &= 0x7f;
        FieldElement::from_bytes(&bytes)
    }

    /// The X25519 Diffie-Hellman function: the `u`-coordinate of
    /// `scalar * self`, computed with the Montgomery ladder (RFC 7748
    /// §5). Runs in constant time in `scalar`; a ladder step is executed
    /// for every bit regardless of value, and the conditional swaps are
    /// implemented with [`FieldElement::conditional_swap`]-equivalent
    /// `conditional_assign` pairs.
    pub fn ladder(&self, scalar: &Scalar) -> MontgomeryPoint {
        let (x2, z2) = self.ladder_xz(scalar);
        let u_out = x2.mul(&z2.invert());
        MontgomeryPoint(u_out.as_bytes())
    }

    /// The ladder's projective output `(x2, z2)` before the final
    /// division, `u = x2/z2`. Shared by [`MontgomeryPoint::ladder`] and
    /// [`MontgomeryPoint::ladder_checked`], which needs `z2` itself to
    /// test for a twist point.
    fn ladder_xz(&self, scalar: &Scalar) -> (FieldElement, FieldElement) {
        let u = self.to_field();
        let k = scalar.as_bytes();

        let mut x1 = u;
        let mut x2 = FieldElement::ONE;
        let mut z2 = FieldElement::ZERO;
        let mut x3 = u;
        let mut z3 = FieldElement::ONE;
        let mut swap = Choice::from(0u8);

        let a24 = constants::aplus2_over_four();

        for pos in (0..255).rev() {
            let bit = Choice::from(((k[pos / 8] >> (pos % 8)) & 1) as u8);
            swap ^= bit;
            conditional_swap(&mut x2, &mut x3, swap);
            conditional_swap(&mut z2, &mut z3, swap);
            swap = bit;

            let a = x2.add(&z2);
            let aa = a.square();
            let b = x2.sub(&z2);
            let bb = b.square();
            let e = aa.sub(&bb);
            let c = x3.add(&z3);
            let d = x3.sub(&z3);
            let da = d.mul(&a);
            let cb = c.mul(&b);
            x3 = da.add(&cb).square();
            z3 = x1.mul(&da.sub(&cb).square());
            x2 = aa.mul(&bb);
            z2 = e.mul(&bb.add(&a24.mul(&e)));
        }
        conditional_swap(&mut x2, &mut x3, swap);
        conditional_swap(&mut z2, &mut z3, swap);
        (x2, z2)
    }

    /// `cu25519_shared_secret_checked`: the same ladder as
    /// [`MontgomeryPoint::ladder`], but reached by way of
    /// `u = (invsqrt(x2*z2)*x2)^2 = x2/z2` instead of a direct field
    /// inversion. The output of a ladder is always twice its input, so a
    /// valid output's `u`-coordinate is always a square; `x2*z2` fails to
    /// have a square root exactly when the input point was on the
    /// quadratic twist rather than the curve itself, and the `invsqrt`
    /// also fails outright when `x2*z2 == 0` (the input was small-order).
    /// Both cases return `None`, matching the checked variant's
    /// reject-twist-and-small-order contract; the caller's contract is to
    /// treat that as a hard Diffie-Hellman failure rather than silently
    /// falling back to the unchecked ladder.
    pub fn ladder_checked(&self, scalar: &Scalar) -> Option<MontgomeryPoint> {
        let (x2, z2) = self.ladder_xz(scalar);
        let xz = x2.mul(&z2);
        let (is_square, inv_sqrt_xz) = field::sqrt_ratio_m1(&FieldElement::ONE, &xz);
        if !bool::from(is_square) {
            return None;
        }
        let u = inv_sqrt_xz.mul(&x2).square();
        Some(MontgomeryPoint(u.as_bytes()))
    }

    /// Converts to the Edwards point with matching sign, given the sign
    /// bit of the affine `y` (equivalently, of Edwards `x`) that the
    /// Montgomery encoding alone cannot carry. `mxs_to_edwards`.
    pub fn to_edwards(&self, sign: u8) -> Option<EdwardsPoint> {
        let u = self.to_field();
        let one = FieldElement::ONE;

        // y = (u-1)/(u+1)
        let numerator = u.sub(&one);
        let denominator = u.add(&one);
        if bool::from(denominator.is_zero()) {
            return None;
        }
        let y = numerator.mul(&denominator.invert());

        let y2 = y.square();
        let ue = y2.sub(&one);
        let ve = constants::edwards_d().mul(&y2).add(&one);
        let (is_sq, mut x) = field::sqrt_ratio_m1(&ue, &ve);
        if !bool::from(is_sq) {
            return None;
        }
        let cur_sign = x.is_negative().unwrap_u8();
        x.conditional_negate(Choice::from(cur_sign ^ (sign & 1)));

        let t = x.mul(&y);
        Some(EdwardsPoint {
            X: x,
            Y: y,
            Z: one,
            T: t,
        })
    }
}

impl From<&EdwardsPoint> for MontgomeryPoint {
    /// `edwards_to_mxs`: `u = (1+y)/(1-y)`.
    fn from(edwards: &EdwardsPoint) -> MontgomeryPoint {
        let zinv = edwards.Z.invert();
        let y = edwards.Y.mul(&zinv);
        let one = FieldElement::ONE;
        let u = one.add(&y).mul(&one.sub(&y).invert());
        MontgomeryPoint(u.as_bytes())
    }
}

/// The high-entropy "Elligator representative" of a Montgomery point:
/// a uniformly random 32-byte string that decodes (via
/// [`representative_to_point`]) to a point indistinguishable from random,
/// used to make X25519 ephemeral public keys look like random noise on
/// the wire (`cu25519_elligator2_rev`/`cu25519_elligator2_gen`).
#[derive(Copy, Clone, Debug)]
pub struct ElligatorRepresentative(pub [u8; 32]);

/// Elligator2 forward map, `r -> u`: given a representative `r`, computes
/// the Montgomery `u`-coordinate of the point it encodes.
///
/// `u = -A / (1 + 2r^2)` when that is a valid curve point, else its
/// quadratic twist partner; one of the two is always on the curve.
pub fn representative_to_point(rep: &ElligatorRepresentative) -> MontgomeryPoint {
    let mut bytes = rep.0;
    bytes[31] &= 0x3f; // representatives only use 254 bits
    let r = FieldElement::from_bytes(&bytes);

    let a = constants::montgomery_a();
    let one = FieldElement::ONE;
    let two = one.add(&one);

    let r2 = r.square();
    let tr2 = two.mul(&r2);
    let denom = one.add(&tr2);
    let u0 = a.negate().mul(&denom.invert());

    let u0_2 = u0.square();
    let u0_3 = u0_2.mul(&u0);
    let rhs = u0_3.add(&a.mul(&u0_2)).add(&u0); // u0^3 + A*u0^2 + u0

    let (is_square, _) = field::sqrt_ratio_m1(&rhs, &one);
    let u = FieldElement::conditional_select(&u0.negate().sub(&a), &u0, is_square);

    MontgomeryPoint(u.as_bytes())
}

/// Elligator2 inverse map, `u -> r`: given a point known to have a valid
/// representative (roughly half of all curve points do), recovers one.
/// Returns `None` for the half of the curve with no representative.
/// `cu25519_elligator2_gen` calls this in a retry loop when generating
/// representable key pairs.
pub fn point_to_representative(point: &MontgomeryPoint, high_y: Choice) -> Option<FieldElement> {
    let u = point.to_field();
    let a = constants::montgomery_a();
    let one = FieldElement::ONE;
    let two = one.add(&one);

    // u must not be -A, and (-u*(u+A))  must be a square for a
    // representative to exist.
    let u_plus_a = u.add(&a);
    if bool::from(u_plus_a.is_zero()) {
        return None;
    }

    let candidate_den = two.mul(&u).mul(&u_plus_a);
    if bool::from(candidate_den.is_zero()) {
        return None;
    }

    let v_test = u.mul(&u_plus_a).negate();
    let (is_sq, _) = field::sqrt_ratio_m1(&v_test, &one);
    if !bool::from(is_sq) {
        return None;
    }

    let chosen_u = FieldElement::conditional_select(&u_plus_a.negate(), &u, high_y);
    let (_, r) = field::sqrt_ratio_m1(&chosen_u, &two.mul(&u).mul(&u_plus_a));
    Some(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edwards::EdwardsPoint;

    #[test]
    fn ladder_with_scalar_one_is_identity() {
        let b: MontgomeryPoint = (&EdwardsPoint::basepoint()).into();
        let out = b.ladder(&Scalar::ONE);
        assert_eq!(out, b);
    }

    #[test]
    fn ladder_with_scalar_zero_is_zero() {
        let b: MontgomeryPoint = (&EdwardsPoint::basepoint()).into();
        let out = b.ladder(&Scalar::ZERO);
        assert_eq!(out.0, [0u8; 32]);
    }

    #[test]
    fn ladder_checked_agrees_with_ladder_for_the_basepoint() {
        let b: MontgomeryPoint = (&EdwardsPoint::basepoint()).into();
        let scalar = Scalar::from_clamped_bytes([7u8; 32]);
        let unchecked = b.ladder(&scalar);
        let checked = b.ladder_checked(&scalar).expect("basepoint ladder must pass the twist/small-order check");
        assert_eq!(unchecked, checked);
    }

    #[test]
    fn ladder_checked_rejects_the_identity_input() {
        let identity = MontgomeryPoint([0u8; 32]);
        let scalar = Scalar::from_clamped_bytes([9u8; 32]);
        assert!(identity.ladder_checked(&scalar).is_none());
    }

    #[test]
    fn edwards_montgomery_round_trip() {
        let b = EdwardsPoint::basepoint();
        let m: MontgomeryPoint = (&b).into();
        let back = m.to_edwards(0).unwrap();
        // The two possible signs give +b or -b; compare u-coordinates
        // via a fresh conversion instead of assuming which sign matched.
        let back_m: MontgomeryPoint = (&back).into();
        assert_eq!(m, back_m);
    }
}
