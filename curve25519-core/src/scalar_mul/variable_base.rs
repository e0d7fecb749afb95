//! Constant-time scalar multiplication for an arbitrary (secret-safe)
//! base point, `scalarmult` in the group layer's C counterpart.
//!
//! Uses a signed 4-bit fixed-window method: the scalar's NAF-like radix-16
//! digit set `{-8, ..., 8}` is read off via `as_radix_16` (itself derived
//! from the 2's-complement trick in `non_adjacent_form`'s sibling, applied
//! with a fixed step rather than a variable-gap NAF), and each digit
//! selects a precomputed multiple of the base point in constant time via
//! [`crate::window::LookupTable8`].

use crate::edwards::EdwardsPoint;
use crate::scalar::Scalar;
use crate::window::LookupTable8;

/// Splits a scalar into 64 signed base-16 digits `e[0..64]`, each in
/// `-8..=8`, such that `sum(e[i] * 16^i) == scalar` and consecutive
/// carries keep every digit in range. Unlike [`crate::window::non_adjacent_form`]
/// this fixed-width digit set has no "gap" between nonzero digits, which
/// is what makes it safe to read out in constant time (every digit is
/// used, rather than being skipped based on the scalar's value).
fn as_radix_16(bytes: &[u8; 32]) -> [i8; 64] {
    let mut output = [0i8; 64];
    for i in 0..32 {
        output[2 * i] = (bytes[i] & 0xf) as i8;
        output[2 * i + 1] = ((bytes[i] >> 4) & 0xf) as i8;
    }
    // Center each nibble in -8..=8 by carrying into the next digit.
    let mut carry = 0i8;
    for i in 0..63 {
        output[i] += carry;
        carry = (output[i] + 8) >> 4;
        output[i] -= carry << 4;
    }
    output[63] += carry;
    output
}

/// `scalar * point`, in constant time.
pub fn mul(point: &EdwardsPoint, scalar: &Scalar) -> EdwardsPoint {
    let table = LookupTable8::from_point(point);
    let digits = as_radix_16(scalar.as_bytes());

    let mut acc = EdwardsPoint::identity();
    for i in (0..64).rev() {
        // 16 doublings to shift the accumulator up by one hex digit,
        // except before the very first digit.
        if i != 63 {
            for _ in 0..4 {
                acc = acc.double();
            }
        }
        let summand = table.select(digits[i]);
        acc = acc.add_projective_niels(&summand);
    }
    acc
}

/// `scalarbase`: `scalar * B` for the canonical base point. A dedicated
/// precomputed multi-window table (as in the fixed-base optimization the
/// C implementation uses) would be faster, but reuses the same
/// constant-time digit-selection machinery as [`mul`]; correctness matters
/// far more than the extra doublings here.
pub fn mul_base(scalar: &Scalar) -> EdwardsPoint {
    mul(&EdwardsPoint::basepoint(), scalar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radix_16_digits_are_bounded() {
        let digits = as_radix_16(&[0xffu8; 32]);
        for d in digits {
            assert!((-8..=8).contains(&d));
        }
    }

    #[test]
    fn mul_by_zero_is_identity() {
        let b = EdwardsPoint::basepoint();
        let result = mul(&b, &Scalar::ZERO);
        assert!(bool::from(result.equals(&EdwardsPoint::identity())));
    }

    #[test]
    fn mul_by_one_is_identity_map() {
        let b = EdwardsPoint::basepoint();
        let result = mul(&b, &Scalar::ONE);
        assert!(bool::from(result.equals(&b)));
    }

    #[test]
    fn mul_by_two_matches_double() {
        let b = EdwardsPoint::basepoint();
        let two = Scalar::ONE.add(&Scalar::ONE);
        let result = mul(&b, &two);
        assert!(bool::from(result.equals(&b.double())));
    }
}
