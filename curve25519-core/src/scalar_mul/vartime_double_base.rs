//! Variable-time double-base scalar multiplication, `scalarmult_wnaf`
//! (two-argument form): computes `a*A + b*B` for an arbitrary point `A`
//! and the canonical base point `B`, as used by every signature
//! verification routine (`sey`, `bmx`, `sha`) where both scalars and both
//! points are public. Never call this with secret scalars: its runtime
//! and memory-access pattern depend on their bits.

use crate::edwards::EdwardsPoint;
use crate::scalar::Scalar;
use crate::window::{non_adjacent_form, NafLookupTable5, NafLookupTable6};

/// `a*point_a + b*B`.
pub fn mul(a: &Scalar, point_a: &EdwardsPoint, b: &Scalar) -> EdwardsPoint {
    let a_naf = non_adjacent_form(a.as_bytes(), 5);
    let b_naf = non_adjacent_form(b.as_bytes(), 6);

    let table_a = NafLookupTable5::from_point(point_a);
    let table_b = NafLookupTable6::from_point(&EdwardsPoint::basepoint());

    let mut acc = EdwardsPoint::identity();
    for i in (0..256).rev() {
        acc = acc.double();
        if a_naf[i] != 0 {
            if a_naf[i] > 0 {
                acc = acc.add(&table_a.select(a_naf[i]));
            } else {
                acc = acc.sub(&table_a.select(-a_naf[i]));
            }
        }
        if b_naf[i] != 0 {
            if b_naf[i] > 0 {
                acc = acc.add(&table_b.select(b_naf[i]));
            } else {
                acc = acc.sub(&table_b.select(-b_naf[i]));
            }
        }
    }
    acc
}

/// `scalarmult_wnaf` (one-argument form): `a * point_a`, variable time.
/// Used internally by `qDSA` verification, which only ever checks a
/// public-key-derived point against a public scalar.
pub fn mul_single(a: &Scalar, point_a: &EdwardsPoint) -> EdwardsPoint {
    let a_naf = non_adjacent_form(a.as_bytes(), 5);
    let table_a = NafLookupTable5::from_point(point_a);

    let mut acc = EdwardsPoint::identity();
    for i in (0..256).rev() {
        acc = acc.double();
        if a_naf[i] > 0 {
            acc = acc.add(&table_a.select(a_naf[i]));
        } else if a_naf[i] < 0 {
            acc = acc.sub(&table_a.select(-a_naf[i]));
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_base_with_zero_scalars_is_identity() {
        let a = EdwardsPoint::basepoint().double();
        let result = mul(&Scalar::ZERO, &a, &Scalar::ZERO);
        assert!(bool::from(result.equals(&EdwardsPoint::identity())));
    }

    #[test]
    fn double_base_matches_variable_base_sum() {
        let a_point = EdwardsPoint::basepoint().double();
        let a_scalar = Scalar::from_bytes_mod_order(&[3u8; 32]);
        let b_scalar = Scalar::from_bytes_mod_order(&[5u8; 32]);

        let expected = crate::scalar_mul::variable_base::mul(&a_point, &a_scalar)
            .add(&crate::scalar_mul::variable_base::mul_base(&b_scalar));
        let got = mul(&a_scalar, &a_point, &b_scalar);
        assert!(bool::from(expected.equals(&got)));
    }

    #[test]
    fn mul_single_matches_variable_base() {
        let a_point = EdwardsPoint::basepoint();
        let a_scalar = Scalar::from_bytes_mod_order(&[9u8; 32]);
        let expected = crate::scalar_mul::variable_base::mul(&a_point, &a_scalar);
        let got = mul_single(&a_scalar, &a_point);
        assert!(bool::from(expected.equals(&got)));
    }
}
