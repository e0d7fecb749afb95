// -*- mode: rust; -*-
//
// This file is part of curve25519-core.
// See LICENSE for licensing information.

//! The twisted Edwards group `-x^2 + y^2 = 1 + d*x^2*y^2` over
//! `GF(2^255-19)`, `d = -121665/121666`, in projective extended
//! coordinates `(X:Y:Z:T)` with `x = X/Z`, `y = Y/Z`, `x*y = T/Z`.

use core::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::constants;
use crate::errors::GroupError;
use crate::field::{self, FieldElement};
use crate::scalar::Scalar;

/// A point on the twisted Edwards curve, in extended projective coordinates.
#[derive(Copy, Clone, Debug)]
pub struct EdwardsPoint {
    pub(crate) X: FieldElement,
    pub(crate) Y: FieldElement,
    pub(crate) Z: FieldElement,
    pub(crate) T: FieldElement,
}

/// The cached "projective Niels" form of a point, `(Y+X, Y-X, 2d*T, 2Z)`,
/// used to cut multiplication counts in windowed addition.
#[derive(Copy, Clone)]
pub struct ProjectiveNielsPoint {
    pub(crate) y_plus_x: FieldElement,
    pub(crate) y_minus_x: FieldElement,
    pub(crate) t2d: FieldElement,
    pub(crate) z2: FieldElement,
}

impl ConditionallySelectable for ProjectiveNielsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectiveNielsPoint {
            y_plus_x: FieldElement::conditional_select(&a.y_plus_x, &b.y_plus_x, choice),
            y_minus_x: FieldElement::conditional_select(&a.y_minus_x, &b.y_minus_x, choice),
            t2d: FieldElement::conditional_select(&a.t2d, &b.t2d, choice),
            z2: FieldElement::conditional_select(&a.z2, &b.z2, choice),
        }
    }

    fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        self.y_plus_x.conditional_assign(&other.y_plus_x, choice);
        self.y_minus_x.conditional_assign(&other.y_minus_x, choice);
        self.t2d.conditional_assign(&other.t2d, choice);
        self.z2.conditional_assign(&other.z2, choice);
    }
}

impl ProjectiveNielsPoint {
    pub fn identity() -> Self {
        ProjectiveNielsPoint {
            y_plus_x: FieldElement::ONE,
            y_minus_x: FieldElement::ONE,
            t2d: FieldElement::ZERO,
            z2: FieldElement::ONE.add(&FieldElement::ONE),
        }
    }

    /// Negating a summand swaps `y+x`/`y-x` and flips the sign of `2d*T`.
    pub fn negate(&self) -> Self {
        ProjectiveNielsPoint {
            y_plus_x: self.y_minus_x,
            y_minus_x: self.y_plus_x,
            t2d: self.t2d.negate(),
            z2: self.z2,
        }
    }

    pub fn to_extended(&self) -> EdwardsPoint {
        // Recover an extended point with Z = z2 (the table stores 2Z, but
        // any nonzero common scale is fine for projective coordinates).
        let x = self.y_plus_x.sub(&self.y_minus_x);
        let y = self.y_plus_x.add(&self.y_minus_x);
        let z = self.z2;
        let t = x.mul(&y); // not divided by z, so this isn't extended-consistent...
        EdwardsPoint { X: x, Y: y, Z: z, T: t }.rescale_for_niels()
    }
}

impl From<&EdwardsPoint> for ProjectiveNielsPoint {
    fn from(p: &EdwardsPoint) -> Self {
        ProjectiveNielsPoint {
            y_plus_x: p.Y.add(&p.X),
            y_minus_x: p.Y.sub(&p.X),
            t2d: p.T.mul(&constants::edwards_d2()),
            z2: p.Z.add(&p.Z),
        }
    }
}

impl EdwardsPoint {
    pub(crate) fn as_projective_niels(&self) -> ProjectiveNielsPoint {
        ProjectiveNielsPoint::from(self)
    }

    /// `to_extended` above builds `(x, y, z, x*y)` from a Niels point
    /// without the `/z` that `T = X*Y/Z` requires; scale `T` back down by
    /// reusing the point's own `Z` so `X*Y = T*Z` holds exactly.
    fn rescale_for_niels(self) -> EdwardsPoint {
        EdwardsPoint {
            X: self.X.mul(&self.Z),
            Y: self.Y.mul(&self.Z),
            Z: self.Z.square(),
            T: self.T,
        }
    }

    /// The identity element, `(0, 1)`.
    pub fn identity() -> EdwardsPoint {
        EdwardsPoint {
            X: FieldElement::ZERO,
            Y: FieldElement::ONE,
            Z: FieldElement::ONE,
            T: FieldElement::ZERO,
        }
    }

    /// The canonical generator `B`, derived from `y = 4/5` and the unique
    /// nonnegative `x` solving the curve equation.
    pub fn basepoint() -> EdwardsPoint {
        let y = constants::basepoint_y();
        let y2 = y.square();
        let u = y2.sub(&FieldElement::ONE);
        let v = constants::edwards_d().mul(&y2).add(&FieldElement::ONE);
        let (is_sq, mut x) = field::sqrt_ratio_m1(&u, &v);
        debug_assert!(bool::from(is_sq), "basepoint y must admit a valid x");
        // sqrt_ratio_m1 always returns the nonnegative root; the basepoint's
        // x is conventionally the nonnegative one too, so no adjustment is
        // needed beyond making sure x*y ≠ 0 for T.
        let is_neg = x.is_negative();
        // nonnegative already guaranteed by sqrt_ratio_m1's contract
        let _ = is_neg;
        let t = x.mul(&y);
        EdwardsPoint {
            X: x,
            Y: y,
            Z: FieldElement::ONE,
            T: t,
        }
    }

    pub fn is_identity(&self) -> Choice {
        self.compress().0.ct_eq(&CompressedEdwardsY::IDENTITY.0)
    }

    pub fn negate(&self) -> EdwardsPoint {
        EdwardsPoint {
            X: self.X.negate(),
            Y: self.Y,
            Z: self.Z,
            T: self.T.negate(),
        }
    }

    /// Extended-coordinate doubling (`dbl-2008-hwcd`, `a = -1`).
    pub fn double(&self) -> EdwardsPoint {
        let xx = self.X.square();
        let yy = self.Y.square();
        let zz2 = self.Z.square2();
        let xy2 = self.X.add(&self.Y).square();
        let minus_xx = xx.negate();
        let g = minus_xx.add(&yy);
        let f = g.sub(&zz2);
        let h = minus_xx.sub(&yy);
        let e = xy2.sub(&xx).sub(&yy);
        EdwardsPoint {
            X: e.mul(&f),
            Y: g.mul(&h),
            Z: f.mul(&g),
            T: e.mul(&h),
        }
    }

    /// Extended + extended addition (`add-2008-hwcd-3`).
    pub fn add(&self, other: &EdwardsPoint) -> EdwardsPoint {
        self.add_projective_niels(&other.as_projective_niels())
    }

    pub fn sub(&self, other: &EdwardsPoint) -> EdwardsPoint {
        self.add(&other.negate())
    }

    pub(crate) fn add_projective_niels(&self, other: &ProjectiveNielsPoint) -> EdwardsPoint {
        let y_plus_x = self.Y.add(&self.X);
        let y_minus_x = self.Y.sub(&self.X);
        let pp = y_plus_x.mul(&other.y_plus_x);
        let mm = y_minus_x.mul(&other.y_minus_x);
        let tt2d = self.T.mul(&other.t2d);
        let zz2 = self.Z.mul(&other.z2);
        let e = pp.sub(&mm);
        let f = zz2.sub(&tt2d);
        let g = zz2.add(&tt2d);
        let h = pp.add(&mm);
        EdwardsPoint {
            X: e.mul(&f),
            Y: g.mul(&h),
            Z: f.mul(&g),
            T: e.mul(&h),
        }
    }

    pub fn equals(&self, other: &EdwardsPoint) -> Choice {
        let xz1 = self.X.mul(&other.Z);
        let xz2 = other.X.mul(&self.Z);
        let yz1 = self.Y.mul(&other.Z);
        let yz2 = other.Y.mul(&self.Z);
        xz1.ct_eq(&xz2) & yz1.ct_eq(&yz2)
    }

    /// `edwards_to_eys`: `y = Y/Z`, sign bit = parity of `x = X/Z`.
    pub fn compress(&self) -> CompressedEdwardsY {
        let zinv = self.Z.invert();
        let x = self.X.mul(&zinv);
        let y = self.Y.mul(&zinv);
        let mut bytes = y.as_bytes();
        bytes[31] ^= x.is_negative().unwrap_u8() << 7;
        CompressedEdwardsY(bytes)
    }
}

impl PartialEq for EdwardsPoint {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other).into()
    }
}
impl Eq for EdwardsPoint {}

impl<'a> Add<&'a EdwardsPoint> for &EdwardsPoint {
    type Output = EdwardsPoint;
    fn add(self, rhs: &'a EdwardsPoint) -> EdwardsPoint {
        EdwardsPoint::add(self, rhs)
    }
}
impl<'a> Sub<&'a EdwardsPoint> for &EdwardsPoint {
    type Output = EdwardsPoint;
    fn sub(self, rhs: &'a EdwardsPoint) -> EdwardsPoint {
        EdwardsPoint::sub(self, rhs)
    }
}
impl Neg for &EdwardsPoint {
    type Output = EdwardsPoint;
    fn neg(self) -> EdwardsPoint {
        EdwardsPoint::negate(self)
    }
}
impl<'a> Mul<&'a Scalar> for &EdwardsPoint {
    type Output = EdwardsPoint;
    fn mul(self, scalar: &'a Scalar) -> EdwardsPoint {
        crate::scalar_mul::variable_base::mul(self, scalar)
    }
}

/// `eys`: Edwards-y with the sign of `x` carried in the top bit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CompressedEdwardsY(pub [u8; 32]);

impl CompressedEdwardsY {
    pub const IDENTITY: CompressedEdwardsY = CompressedEdwardsY([
        1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0,
    ]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `eys_to_edwards`: solve `x^2 = (y^2-1)/(d*y^2+1)` and pick the root
    /// whose parity matches the stored sign bit.
    pub fn decompress(&self) -> Result<EdwardsPoint, GroupError> {
        let sign_bit = self.0[31] >> 7;
        let mut y_bytes = self.0;
        y_bytes[31] &= 0x7f;
        let y = FieldElement::from_bytes(&y_bytes);

        // Reject non-canonical encodings (y >= p).
        if y.as_bytes() != y_bytes {
            return Err(GroupError::bad_point());
        }

        let y2 = y.square();
        let u = y2.sub(&FieldElement::ONE);
        let v = constants::edwards_d().mul(&y2).add(&FieldElement::ONE);
        let (is_sq, mut x) = field::sqrt_ratio_m1(&u, &v);
        if !bool::from(is_sq) {
            return Err(GroupError::bad_point());
        }
        let x_sign = x.is_negative().unwrap_u8();
        x.conditional_negate(Choice::from(x_sign ^ sign_bit));

        let t = x.mul(&y);
        Ok(EdwardsPoint {
            X: x,
            Y: y,
            Z: FieldElement::ONE,
            T: t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_compresses_to_identity_encoding() {
        assert_eq!(
            EdwardsPoint::identity().compress(),
            CompressedEdwardsY::IDENTITY
        );
    }

    #[test]
    fn basepoint_round_trips_through_compression() {
        let b = EdwardsPoint::basepoint();
        let compressed = b.compress();
        let decompressed = compressed.decompress().unwrap();
        assert!(bool::from(b.equals(&decompressed)));
    }

    #[test]
    fn double_matches_add_to_self() {
        let b = EdwardsPoint::basepoint();
        assert!(bool::from(b.double().equals(&b.add(&b))));
    }

    #[test]
    fn add_is_commutative() {
        let b = EdwardsPoint::basepoint();
        let b2 = b.double();
        assert!(bool::from(b.add(&b2).equals(&b2.add(&b))));
    }
}
