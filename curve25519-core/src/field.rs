//! The public field element type, `GF(2^255 - 19)`.
//!
//! This is a thin alias over whichever serial backend matches the target's
//! native word size: five 51-bit `u64` limbs on 64-bit targets, ten
//! alternating 26/25-bit `u32` limbs on 32-bit targets. Both backends
//! implement the identical operation set (duck-typed, not a shared trait:
//! the `cfg` selection below already picks exactly one concrete type per
//! build, so a `FieldRep` trait would only add indirection with no
//! runtime benefit), so generic code written against [`FieldElement`]
//! never needs to know which backend it got.

use cfg_if::cfg_if;
use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

cfg_if! {
    if #[cfg(curve25519_bits = "32")] {
        pub use crate::backend::serial::u32::field::FieldElement2625 as FieldElement;
    } else if #[cfg(target_pointer_width = "32")] {
        pub use crate::backend::serial::u32::field::FieldElement2625 as FieldElement;
    } else {
        pub use crate::backend::serial::u64::field::FieldElement51 as FieldElement;
    }
}

/// `sqrt(u/v)`, the workhorse used by Ristretto decoding and Elligator2.
///
/// Returns `(1, sqrt(u/v))` if `u/v` is a square, else `(0, sqrt(i*u/v))`
/// where `i = sqrt(-1)`. The returned root is always the nonnegative one
/// (even least-significant byte). Matches the RFC-draft `SQRT_RATIO_M1`
/// used by Ristretto255.
pub fn sqrt_ratio_m1(u: &FieldElement, v: &FieldElement) -> (Choice, FieldElement) {
    let v3 = v.square().mul(v);
    let v7 = v3.square().mul(v);
    let mut r = u.mul(&v3).mul(&u.mul(&v7).pow_p58());

    let check = v.mul(&r.square());
    let i = crate::constants::sqrt_m1();

    let correct_sign_sqrt = check.ct_eq(u);
    let flipped_sign_sqrt = check.ct_eq(&u.negate());
    let flipped_sign_sqrt_i = check.ct_eq(&u.negate().mul(&i));

    let r_prime = i.mul(&r);
    r.conditional_assign(&r_prime, flipped_sign_sqrt | flipped_sign_sqrt_i);

    // Always choose the nonnegative square root.
    let r_is_negative = r.is_negative();
    r.conditional_negate(r_is_negative);

    let was_nonzero_square = correct_sign_sqrt | flipped_sign_sqrt;
    (was_nonzero_square, r)
}

/// `sqrt(a)`, returning `None` if `a` is not a quadratic residue.
pub fn sqrt(a: &FieldElement) -> Option<FieldElement> {
    let (is_square, root) = sqrt_ratio_m1(a, &FieldElement::ONE);
    if bool::from(is_square) {
        Some(root)
    } else {
        None
    }
}

/// `1 / sqrt(a)`, returning `None` if `a` is not a quadratic residue.
pub fn invsqrt(a: &FieldElement) -> Option<FieldElement> {
    let (is_square, root) = sqrt_ratio_m1(&FieldElement::ONE, a);
    if bool::from(is_square) {
        Some(root)
    } else {
        None
    }
}

/// Constant-time `a > b`, comparing canonical little-endian byte encodings
/// as unsigned big-endian integers. Used to reject `S >= L` in signature
/// verification.
pub fn gt(a: &FieldElement, b: &FieldElement) -> Choice {
    let ab = a.as_bytes();
    let bb = b.as_bytes();
    let mut gt = Choice::from(0);
    let mut eq_so_far = Choice::from(1);
    for i in (0..32).rev() {
        let byte_gt = Choice::from((ab[i] > bb[i]) as u8);
        let byte_eq = Choice::from((ab[i] == bb[i]) as u8);
        gt |= eq_so_far & byte_gt;
        eq_so_far &= byte_eq;
    }
    gt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_ratio_m1_matches_perfect_square() {
        let one = FieldElement::ONE;
        let (was_square, root) = sqrt_ratio_m1(&one, &one);
        assert!(bool::from(was_square));
        assert_eq!(root.as_bytes(), FieldElement::ONE.as_bytes());
    }

    #[test]
    fn sqrt_m1_squares_to_minus_one() {
        let i = crate::constants::sqrt_m1();
        let should_be_minus_one = i.mul(&i);
        assert_eq!(should_be_minus_one.as_bytes(), FieldElement::ONE.negate().as_bytes());
    }
}
