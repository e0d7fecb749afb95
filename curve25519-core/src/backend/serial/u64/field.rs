// -*- mode: rust; -*-
//
// This file is part of curve25519-core.
// See LICENSE for licensing information.

//! A field element in `GF(2^255 - 19)`, represented as five `u64` limbs of
//! 51 bits each, `value = sum_i limbs[i] * 2^(51*i)`.
//!
//! Limbs are kept fully reduced (each `< 2^51`) between public operations;
//! every arithmetic op that can overflow a limb carries and, where needed,
//! folds the excess back in through `* 19` (since `2^255 = 19 mod p`).
//! This trades the lazy-reduction headroom the upstream library uses for a
//! simpler invariant that's easier to get right by inspection.

use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

/// The low 51 bits of a `u64`.
const LOW_51_BIT_MASK: u64 = (1u64 << 51) - 1;

#[derive(Copy, Clone)]
pub struct FieldElement51(pub(crate) [u64; 5]);

impl Debug for FieldElement51 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement51({:?})", &self.0[..])
    }
}

impl Eq for FieldElement51 {}
impl PartialEq for FieldElement51 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl ConstantTimeEq for FieldElement51 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.as_bytes().ct_eq(&other.as_bytes())
    }
}

impl ConditionallySelectable for FieldElement51 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        FieldElement51([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
            u64::conditional_select(&a.0[4], &b.0[4], choice),
        ])
    }

    fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        self.0[0].conditional_assign(&other.0[0], choice);
        self.0[1].conditional_assign(&other.0[1], choice);
        self.0[2].conditional_assign(&other.0[2], choice);
        self.0[3].conditional_assign(&other.0[3], choice);
        self.0[4].conditional_assign(&other.0[4], choice);
    }
}

impl ConditionallyNegatable for FieldElement51 {
    fn conditional_negate(&mut self, choice: Choice) {
        let neg = self.neg();
        self.conditional_assign(&neg, choice);
    }
}

impl FieldElement51 {
    pub const ZERO: FieldElement51 = FieldElement51([0, 0, 0, 0, 0]);
    pub const ONE: FieldElement51 = FieldElement51([1, 0, 0, 0, 0]);
    pub const MINUS_ONE: FieldElement51 = FieldElement51([
        2251799813685228,
        2251799813685247,
        2251799813685247,
        2251799813685247,
        2251799813685247,
    ]);

    pub const fn from_limbs(limbs: [u64; 5]) -> FieldElement51 {
        FieldElement51(limbs)
    }

    pub const fn limbs(&self) -> &[u64; 5] {
        &self.0
    }

    /// Load a field element from 32 little-endian bytes. The top bit of
    /// byte 31 is discarded, matching the "most significant bit always
    /// dropped" loading convention.
    pub fn from_bytes(bytes: &[u8; 32]) -> FieldElement51 {
        let load8 = |input: &[u8]| -> u64 {
            (input[0] as u64)
                | ((input[1] as u64) << 8)
                | ((input[2] as u64) << 16)
                | ((input[3] as u64) << 24)
                | ((input[4] as u64) << 32)
                | ((input[5] as u64) << 40)
                | ((input[6] as u64) << 48)
                | ((input[7] as u64) << 56)
        };

        FieldElement51([
            load8(&bytes[0..8]) & LOW_51_BIT_MASK,
            (load8(&bytes[6..14]) >> 3) & LOW_51_BIT_MASK,
            (load8(&bytes[12..20]) >> 6) & LOW_51_BIT_MASK,
            (load8(&bytes[19..27]) >> 1) & LOW_51_BIT_MASK,
            (load8(&bytes[24..32]) >> 12) & LOW_51_BIT_MASK,
        ])
    }

    /// Reduce-and-store: the canonical little-endian representative, `< p`.
    pub fn as_bytes(&self) -> [u8; 32] {
        let mut limbs = FieldElement51::reduce(self.0).0;

        // q = 1 iff limbs >= p; computed as the carry bit of limbs+19.
        let mut q = (limbs[0] + 19) >> 51;
        q = (limbs[1] + q) >> 51;
        q = (limbs[2] + q) >> 51;
        q = (limbs[3] + q) >> 51;
        q = (limbs[4] + q) >> 51;

        limbs[0] += 19 * q;

        limbs[1] += limbs[0] >> 51;
        limbs[0] &= LOW_51_BIT_MASK;
        limbs[2] += limbs[1] >> 51;
        limbs[1] &= LOW_51_BIT_MASK;
        limbs[3] += limbs[2] >> 51;
        limbs[2] &= LOW_51_BIT_MASK;
        limbs[4] += limbs[3] >> 51;
        limbs[3] &= LOW_51_BIT_MASK;
        limbs[4] &= LOW_51_BIT_MASK;

        let mut s = [0u8; 32];
        s[0] = limbs[0] as u8;
        s[1] = (limbs[0] >> 8) as u8;
        s[2] = (limbs[0] >> 16) as u8;
        s[3] = (limbs[0] >> 24) as u8;
        s[4] = (limbs[0] >> 32) as u8;
        s[5] = (limbs[0] >> 40) as u8;
        s[6] = ((limbs[0] >> 48) | (limbs[1] << 3)) as u8;
        s[7] = (limbs[1] >> 5) as u8;
        s[8] = (limbs[1] >> 13) as u8;
        s[9] = (limbs[1] >> 21) as u8;
        s[10] = (limbs[1] >> 29) as u8;
        s[11] = (limbs[1] >> 37) as u8;
        s[12] = ((limbs[1] >> 45) | (limbs[2] << 6)) as u8;
        s[13] = (limbs[2] >> 2) as u8;
        s[14] = (limbs[2] >> 10) as u8;
        s[15] = (limbs[2] >> 18) as u8;
        s[16] = (limbs[2] >> 26) as u8;
        s[17] = (limbs[2] >> 34) as u8;
        s[18] = (limbs[2] >> 42) as u8;
        s[19] = ((limbs[2] >> 50) | (limbs[3] << 1)) as u8;
        s[20] = (limbs[3] >> 7) as u8;
        s[21] = (limbs[3] >> 15) as u8;
        s[22] = (limbs[3] >> 23) as u8;
        s[23] = (limbs[3] >> 31) as u8;
        s[24] = (limbs[3] >> 39) as u8;
        s[25] = ((limbs[3] >> 47) | (limbs[4] << 4)) as u8;
        s[26] = (limbs[4] >> 4) as u8;
        s[27] = (limbs[4] >> 12) as u8;
        s[28] = (limbs[4] >> 20) as u8;
        s[29] = (limbs[4] >> 28) as u8;
        s[30] = (limbs[4] >> 36) as u8;
        s[31] = (limbs[4] >> 44) as u8;

        s
    }

    /// Carry-propagate `limbs`, folding any overflow of the top limb back
    /// in through `* 19` (since `2^255 ≡ 19 (mod p)`). Output limbs are
    /// each `< 2^51` but the value is not necessarily `< p`.
    fn reduce(mut limbs: [u64; 5]) -> FieldElement51 {
        let c0 = limbs[0] >> 51;
        limbs[0] &= LOW_51_BIT_MASK;
        limbs[1] += c0;
        let c1 = limbs[1] >> 51;
        limbs[1] &= LOW_51_BIT_MASK;
        limbs[2] += c1;
        let c2 = limbs[2] >> 51;
        limbs[2] &= LOW_51_BIT_MASK;
        limbs[3] += c2;
        let c3 = limbs[3] >> 51;
        limbs[3] &= LOW_51_BIT_MASK;
        limbs[4] += c3;
        let c4 = limbs[4] >> 51;
        limbs[4] &= LOW_51_BIT_MASK;
        limbs[0] += c4 * 19;
        let c0 = limbs[0] >> 51;
        limbs[0] &= LOW_51_BIT_MASK;
        limbs[1] += c0;

        FieldElement51(limbs)
    }

    pub fn add(&self, rhs: &FieldElement51) -> FieldElement51 {
        let mut out = [0u64; 5];
        for i in 0..5 {
            out[i] = self.0[i] + rhs.0[i];
        }
        FieldElement51::reduce(out)
    }

    /// Subtraction, guarded against underflow by first adding `4p` (each
    /// limb of `self` is `< 2^51`, so `4p`'s headroom is ample).
    pub fn sub(&self, rhs: &FieldElement51) -> FieldElement51 {
        const FOUR_P_LIMB0: u64 = 9_007_199_254_740_916; // 4*(2^51 - 19)
        const FOUR_P_LIMBI: u64 = 9_007_199_254_740_988; // 4*(2^51 - 1)
        let out = [
            (self.0[0] + FOUR_P_LIMB0) - rhs.0[0],
            (self.0[1] + FOUR_P_LIMBI) - rhs.0[1],
            (self.0[2] + FOUR_P_LIMBI) - rhs.0[2],
            (self.0[3] + FOUR_P_LIMBI) - rhs.0[3],
            (self.0[4] + FOUR_P_LIMBI) - rhs.0[4],
        ];
        FieldElement51::reduce(out)
    }

    pub fn negate(&self) -> FieldElement51 {
        FieldElement51::ZERO.sub(self)
    }

    #[inline(always)]
    fn m(x: u64, y: u64) -> u128 {
        (x as u128) * (y as u128)
    }

    pub fn mul(&self, rhs: &FieldElement51) -> FieldElement51 {
        let a = &self.0;
        let b = &rhs.0;

        // 2*19*b[i] for i>0, used to fold the wrap-around terms of the
        // schoolbook product back into the low limbs (2^255 = 19 mod p).
        let b1_19 = b[1] * 19;
        let b2_19 = b[2] * 19;
        let b3_19 = b[3] * 19;
        let b4_19 = b[4] * 19;

        let c0 = Self::m(a[0], b[0])
            + Self::m(a[4], b1_19)
            + Self::m(a[3], b2_19)
            + Self::m(a[2], b3_19)
            + Self::m(a[1], b4_19);
        let c1 = Self::m(a[1], b[0])
            + Self::m(a[0], b[1])
            + Self::m(a[4], b2_19)
            + Self::m(a[3], b3_19)
            + Self::m(a[2], b4_19);
        let c2 = Self::m(a[2], b[0])
            + Self::m(a[1], b[1])
            + Self::m(a[0], b[2])
            + Self::m(a[4], b3_19)
            + Self::m(a[3], b4_19);
        let c3 = Self::m(a[3], b[0])
            + Self::m(a[2], b[1])
            + Self::m(a[1], b[2])
            + Self::m(a[0], b[3])
            + Self::m(a[4], b4_19);
        let c4 = Self::m(a[4], b[0])
            + Self::m(a[3], b[1])
            + Self::m(a[2], b[2])
            + Self::m(a[1], b[3])
            + Self::m(a[0], b[4]);

        Self::carry_u128([c0, c1, c2, c3, c4])
    }

    fn carry_u128(c: [u128; 5]) -> FieldElement51 {
        let low_51_bit_mask_128: u128 = (1u128 << 51) - 1;
        let [c0, c1, c2, c3, c4] = c;

        let t0 = (c0 & low_51_bit_mask_128) as u64;
        let carry0 = (c0 >> 51) as u64;

        let c1 = c1 + carry0 as u128;
        let t1 = (c1 & low_51_bit_mask_128) as u64;
        let carry1 = (c1 >> 51) as u64;

        let c2 = c2 + carry1 as u128;
        let t2 = (c2 & low_51_bit_mask_128) as u64;
        let carry2 = (c2 >> 51) as u64;

        let c3 = c3 + carry2 as u128;
        let t3 = (c3 & low_51_bit_mask_128) as u64;
        let carry3 = (c3 >> 51) as u64;

        let c4 = c4 + carry3 as u128;
        let t4 = (c4 & low_51_bit_mask_128) as u64;
        let carry4 = (c4 >> 51) as u64;

        let t0 = t0 + carry4 * 19;
        let carry0b = t0 >> 51;
        let t0 = t0 & LOW_51_BIT_MASK;
        let t1 = t1 + carry0b;

        FieldElement51([t0, t1, t2, t3, t4])
    }

    pub fn square(&self) -> FieldElement51 {
        self.mul(self)
    }

    /// `2 * self^2`, used by the Edwards doubling formula.
    pub fn square2(&self) -> FieldElement51 {
        let s = self.square();
        s.add(&s)
    }

    pub fn mul_small(&self, scalar: u32) -> FieldElement51 {
        let s = scalar as u128;
        let c0 = (self.0[0] as u128) * s;
        let c1 = (self.0[1] as u128) * s;
        let c2 = (self.0[2] as u128) * s;
        let c3 = (self.0[3] as u128) * s;
        let c4 = (self.0[4] as u128) * s;
        Self::carry_u128([c0, c1, c2, c3, c4])
    }

    /// Repeated squaring, `self^(2^k)`.
    pub fn pow2k(&self, mut k: u32) -> FieldElement51 {
        let mut z = self.square();
        k -= 1;
        while k > 0 {
            z = z.square();
            k -= 1;
        }
        z
    }

    /// Returns `(self^((p-1)/2 - 1), self^11)`; the shared addition chain
    /// used by both [`FieldElement51::invert`] and the `(p+3)/8` power
    /// used for square roots.
    fn pow22501(&self) -> (FieldElement51, FieldElement51) {
        let t0 = self.square();
        let t1 = t0.square().square();
        let t2 = self.mul(&t1);
        let t3 = t0.mul(&t2);
        let t4 = t3.square();
        let t5 = t2.mul(&t4);
        let t6 = t5.pow2k(5);
        let t7 = t6.mul(&t5);
        let t8 = t7.pow2k(10);
        let t9 = t8.mul(&t7);
        let t10 = t9.pow2k(20);
        let t11 = t10.mul(&t9);
        let t12 = t11.pow2k(10);
        let t13 = t12.mul(&t7);
        let t14 = t13.pow2k(50);
        let t15 = t14.mul(&t13);
        let t16 = t15.pow2k(100);
        let t17 = t16.mul(&t15);
        let t18 = t17.pow2k(50);
        let t19 = t18.mul(&t13);

        (t19, t3)
    }

    /// `self^(p-2)`, i.e. the multiplicative inverse by Fermat's little
    /// theorem. The caller must ensure `self != 0`; the inverse of zero is
    /// zero, which is never a useful result.
    pub fn invert(&self) -> FieldElement51 {
        let (t19, t3) = self.pow22501();
        let t20 = t19.pow2k(5);
        t20.mul(&t3)
    }

    /// `self^((p-5)/8)`, the exponent used by the `sqrt_ratio_m1` Elligator
    /// / Ristretto square-root-of-ratio routine.
    pub(crate) fn pow_p58(&self) -> FieldElement51 {
        let (t19, _) = self.pow22501();
        let t20 = t19.pow2k(2);
        self.mul(&t20)
    }

    pub fn is_negative(&self) -> Choice {
        let bytes = self.as_bytes();
        (bytes[0] & 1).into()
    }

    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&FieldElement51::ZERO)
    }
}

impl<'a> Add<&'a FieldElement51> for &FieldElement51 {
    type Output = FieldElement51;
    fn add(self, rhs: &'a FieldElement51) -> FieldElement51 {
        FieldElement51::add(self, rhs)
    }
}

impl<'a> Sub<&'a FieldElement51> for &FieldElement51 {
    type Output = FieldElement51;
    fn sub(self, rhs: &'a FieldElement51) -> FieldElement51 {
        FieldElement51::sub(self, rhs)
    }
}

impl<'a> Mul<&'a FieldElement51> for &FieldElement51 {
    type Output = FieldElement51;
    fn mul(self, rhs: &'a FieldElement51) -> FieldElement51 {
        FieldElement51::mul(self, rhs)
    }
}

impl Neg for &FieldElement51 {
    type Output = FieldElement51;
    fn neg(self) -> FieldElement51 {
        FieldElement51::negate(self)
    }
}

impl Neg for FieldElement51 {
    type Output = FieldElement51;
    fn neg(self) -> FieldElement51 {
        FieldElement51::negate(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_roundtrip() {
        let a = FieldElement51::from_bytes(&[7u8; 32]);
        let b = FieldElement51::from_bytes(&[3u8; 32]);
        let sum = a.add(&b);
        let back = sum.sub(&b);
        assert_eq!(back.as_bytes(), a.as_bytes());
    }

    #[test]
    fn mul_one_is_identity() {
        let a = FieldElement51::from_bytes(&[9u8; 32]);
        assert_eq!(a.mul(&FieldElement51::ONE).as_bytes(), a.as_bytes());
    }

    #[test]
    fn invert_round_trips() {
        let a = FieldElement51::from_bytes(&[5u8; 32]);
        let inv = a.invert();
        let prod = a.mul(&inv);
        assert_eq!(prod.as_bytes(), FieldElement51::ONE.as_bytes());
    }

    #[test]
    fn negate_twice_is_identity() {
        let a = FieldElement51::from_bytes(&[42u8; 32]);
        assert_eq!(a.negate().negate().as_bytes(), a.as_bytes());
    }
}
