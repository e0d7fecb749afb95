// -*- mode: rust; -*-
//
// This file is part of curve25519-core.
// See LICENSE for licensing information.

//! Ristretto255: a prime-order group built as a quotient of the Edwards
//! curve's cofactor-8 group, per the ristretto255 draft. Every group
//! element has a single canonical 32-byte encoding and there is no
//! small-subgroup confusion to guard against in protocols built on top.

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

use crate::constants;
use crate::edwards::EdwardsPoint;
use crate::errors::GroupError;
use crate::field::{self, FieldElement};
use crate::scalar::Scalar;

/// A Ristretto255 group element, represented internally by any Edwards
/// point in its coset (the quotient by the cofactor-8 subgroup), which is
/// why [`RistrettoPoint`] equality is implemented via [`RistrettoPoint::ct_eq`]
/// rather than comparing the inner coordinates.
#[derive(Copy, Clone, Debug)]
pub struct RistrettoPoint(pub(crate) EdwardsPoint);

/// The canonical 32-byte encoding of a [`RistrettoPoint`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CompressedRistretto(pub [u8; 32]);

impl RistrettoPoint {
    pub fn identity() -> RistrettoPoint {
        RistrettoPoint(EdwardsPoint::identity())
    }

    pub fn basepoint() -> RistrettoPoint {
        RistrettoPoint(EdwardsPoint::basepoint())
    }

    pub fn add(&self, other: &RistrettoPoint) -> RistrettoPoint {
        RistrettoPoint(self.0.add(&other.0))
    }

    pub fn sub(&self, other: &RistrettoPoint) -> RistrettoPoint {
        RistrettoPoint(self.0.sub(&other.0))
    }

    pub fn negate(&self) -> RistrettoPoint {
        RistrettoPoint(self.0.negate())
    }

    pub fn mul(&self, scalar: &Scalar) -> RistrettoPoint {
        RistrettoPoint(crate::scalar_mul::variable_base::mul(&self.0, scalar))
    }

    /// The Montgomery `u`-coordinate of (any Edwards representative of)
    /// this coset. Used by the Ristretto qDSA verification path, which
    /// needs only `u`-coordinates and never the Ristretto encoding's
    /// canonical-representative machinery.
    pub fn to_montgomery(&self) -> crate::montgomery::MontgomeryPoint {
        (&self.0).into()
    }

    /// The canonical encoding (`ristretto255` §4.3.2 `ENCODE`), grounded
    /// on `edwards_to_ristretto`: compute the unique representative of
    /// this point's coset with the smallest nonnegative `x*y/z` sign
    /// convention, then emit its `(x, y)` in the Ristretto `s`-coordinate
    /// form.
    pub fn compress(&self) -> CompressedRistretto {
        let p = &self.0;
        let x = p.X;
        let y = p.Y;
        let z = p.Z;
        let t = p.T;

        let u1 = z.add(&y).mul(&z.sub(&y));
        let u2 = x.mul(&y);
        let (_, invsqrt) = field::sqrt_ratio_m1(&FieldElement::ONE, &u1.mul(&u2.square()));
        let den1 = invsqrt.mul(&u1);
        let den2 = invsqrt.mul(&u2);
        let z_inv = den1.mul(&den2).mul(&t);

        let ix = x.mul(&constants::sqrt_m1());
        let iy = y.mul(&constants::sqrt_m1());
        let enchanted_denominator = den1.mul(&constants::invsqrt_a_minus_d());

        let rotate = (t.mul(&z_inv)).is_negative();

        let x_final = FieldElement::conditional_select(&x, &iy, rotate);
        let y_final = FieldElement::conditional_select(&y, &ix, rotate);
        let z_final = z;
        let den_inv = FieldElement::conditional_select(&den2, &enchanted_denominator, rotate);

        let mut y_final = y_final;
        y_final.conditional_negate((x_final.mul(&z_inv)).is_negative());

        let s = den_inv.mul(&z_final.sub(&y_final));
        let s_is_neg = s.is_negative();
        let s = FieldElement::conditional_select(&s, &s.negate(), s_is_neg);

        CompressedRistretto(s.as_bytes())
    }
}

impl PartialEq for RistrettoPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for RistrettoPoint {}

impl ConstantTimeEq for RistrettoPoint {
    /// `ristretto_equal`: two points are equal iff `x1*y2 == x2*y1` or
    /// `y1*y2 == x1*x2` in their shared Edwards representation (coset
    /// equality, not coordinate equality).
    fn ct_eq(&self, other: &Self) -> Choice {
        let (x1, y1) = (self.0.X, self.0.Y);
        let (x2, y2) = (other.0.X, other.0.Y);
        let z1 = self.0.Z;
        let z2 = other.0.Z;
        let check1 = (x1.mul(&z2)).ct_eq(&x2.mul(&z1));
        let check2 = (y1.mul(&z2)).ct_eq(&y2.mul(&z1));
        check1 | check2
    }
}

impl CompressedRistretto {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `ristretto_to_edwards`: `DECODE` from the ristretto255 draft.
    /// Rejects non-canonical `s` encodings and any `s` that does not
    /// correspond to a valid point.
    pub fn decompress(&self) -> Result<RistrettoPoint, GroupError> {
        let s = FieldElement::from_bytes(&self.0);

        if s.as_bytes() != self.0 {
            return Err(GroupError::bad_point()); // non-canonical s
        }
        if bool::from(s.is_negative()) {
            return Err(GroupError::bad_point()); // s must be nonnegative
        }

        let one = FieldElement::ONE;
        let s2 = s.square();
        let u1 = one.sub(&s2);
        let u2 = one.add(&s2);
        let u2_sqr = u2.square();

        let v = constants::edwards_d().negate().mul(&u1.square()).sub(&u2_sqr);
        let (was_square, invsqrt) = field::sqrt_ratio_m1(&one, &v.mul(&u2_sqr));

        if !bool::from(was_square) {
            return Err(GroupError::bad_point());
        }

        let den_x = invsqrt.mul(&u2);
        let den_y = invsqrt.mul(&den_x).mul(&v);

        let mut x = s.add(&s).mul(&den_x);
        let x_neg = x.is_negative();
        x.conditional_negate(x_neg);

        let y = u1.mul(&den_y);
        let t = x.mul(&y);

        if bool::from(t.is_negative()) || bool::from(y.is_zero()) {
            return Err(GroupError::bad_point());
        }

        Ok(RistrettoPoint(EdwardsPoint {
            X: x,
            Y: y,
            Z: one,
            T: t,
        }))
    }
}

/// The Ristretto255 hash-to-group map, `ristretto_from_uniform`: takes 64
/// bytes of uniform randomness (a wide hash output) and produces a
/// RistrettoPoint via two applications of the Elligator-style map
/// followed by addition, so the result carries no detectable structure
/// tying it back to the input.
pub fn from_uniform_bytes(bytes: &[u8; 64]) -> RistrettoPoint {
    let mut half0 = [0u8; 32];
    let mut half1 = [0u8; 32];
    half0.copy_from_slice(&bytes[0..32]);
    half1.copy_from_slice(&bytes[32..64]);

    let p0 = map_to_curve(&FieldElement::from_bytes(&half0));
    let p1 = map_to_curve(&FieldElement::from_bytes(&half1));
    RistrettoPoint(p0.add(&p1))
}

/// The ristretto255 `MAP` function applied to a single field element.
fn map_to_curve(t: &FieldElement) -> EdwardsPoint {
    let one = FieldElement::ONE;
    let minus_one = one.negate();
    let d = constants::edwards_d();
    let sqrt_m1 = constants::sqrt_m1();

    let r = sqrt_m1.mul(&t.square());
    let u = r.add(&one).mul(&constants::one_minus_edwards_d_squared());
    let v = minus_one
        .sub(&r.mul(&d))
        .mul(&r.add(&d));

    let (was_square, mut s) = field::sqrt_ratio_m1(&u, &v);
    let s_prime = s.mul(t).negate();
    let s_prime_is_neg = (s_prime.mul(&s).mul(&(r.add(&one)))).is_negative();
    let s_prime = {
        let mut sp = s_prime;
        sp.conditional_negate(s_prime_is_neg ^ Choice::from(1));
        sp
    };

    s.conditional_assign(&s_prime.negate(), !was_square);
    let c = FieldElement::conditional_select(&minus_one, &r, was_square);

    let n = c.mul(&r.sub(&one)).mul(&constants::edwards_d_minus_one_squared()).sub(&v);
    let s2 = s.square();

    let w0 = s.add(&s).mul(&v);
    let w1 = n.mul(&constants::sqrt_ad_minus_one());
    let w2 = one.sub(&s2);
    let w3 = one.add(&s2);

    EdwardsPoint {
        X: w0.mul(&w3),
        Y: w2.mul(&w1),
        Z: w1.mul(&w3),
        T: w0.mul(&w2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_round_trips() {
        let p = RistrettoPoint::identity();
        let c = p.compress();
        let back = c.decompress().unwrap();
        assert!(bool::from(p.ct_eq(&back)));
    }

    #[test]
    fn basepoint_round_trips() {
        let p = RistrettoPoint::basepoint();
        let c = p.compress();
        let back = c.decompress().unwrap();
        assert!(bool::from(p.ct_eq(&back)));
    }

    #[test]
    fn double_plus_negate_is_identity() {
        let p = RistrettoPoint::basepoint();
        let doubled = p.add(&p);
        let back = doubled.sub(&p).sub(&p);
        assert!(bool::from(back.ct_eq(&RistrettoPoint::identity())));
    }

    #[test]
    fn from_uniform_bytes_is_deterministic() {
        let bytes = [7u8; 64];
        let a = from_uniform_bytes(&bytes);
        let b = from_uniform_bytes(&bytes);
        assert!(bool::from(a.ct_eq(&b)));
    }

    /// `scalarbase(s)` encoded to Ristretto bytes and decoded back must be
    /// `ristretto_equal` to the original point, across a spread of scalar
    /// values (not just the basepoint/identity edge cases above).
    #[test]
    fn scalarbase_round_trips_through_ristretto_for_many_scalars() {
        for seed in 0u8..100 {
            let mut bytes = [0u8; 32];
            for (i, b) in bytes.iter_mut().enumerate() {
                *b = seed.wrapping_mul(7).wrapping_add(i as u8);
            }
            let s = Scalar::from_bytes_mod_order(&bytes);
            let a = RistrettoPoint::basepoint().mul(&s);
            let encoded = a.compress();
            let decoded = encoded.decompress().unwrap();
            assert!(bool::from(a.ct_eq(&decoded)), "round trip failed for seed {seed}");
        }
    }
}
