// -*- mode: rust; -*-
//
// This file is part of curve25519-core.
// See LICENSE for licensing information.

//! Scalars modulo the prime group order
//! `l = 2^252 + 27742317777372353535851937790883648493`.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::constants::L;

/// An integer modulo `l`, stored as 32 little-endian bytes.
///
/// Reduction uses the schoolbook `modL` algorithm (a 64-round
/// Barrett-style reduction processing one byte of carry at a time),
/// the same approach used by the reference `ref10`/tweetnacl
/// implementations, rather than Montgomery arithmetic: it is simpler to
/// get right by hand and scalar reduction is never the hot path.
#[derive(Copy, Clone, Debug)]
pub struct Scalar {
    pub(crate) bytes: [u8; 32],
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.bytes.ct_eq(&other.bytes)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut bytes = [0u8; 32];
        for i in 0..32 {
            bytes[i] = u8::conditional_select(&a.bytes[i], &b.bytes[i], choice);
        }
        Scalar { bytes }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for Scalar {}

impl Scalar {
    pub const ZERO: Scalar = Scalar { bytes: [0u8; 32] };
    pub const ONE: Scalar = Scalar {
        bytes: [
            1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0,
        ],
    };

    /// Builds a scalar from bytes already known to be < `l`, without
    /// reduction. Used for the clamped/masked secret-key bytes produced by
    /// [`Scalar::from_clamped_bytes`], which are below `l` by construction.
    pub fn from_bits_unreduced(bytes: [u8; 32]) -> Scalar {
        Scalar { bytes }
    }

    /// Reduces a 32-byte little-endian integer modulo `l`.
    pub fn from_bytes_mod_order(bytes: &[u8; 32]) -> Scalar {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(bytes);
        Scalar::from_bytes_mod_order_wide(&wide)
    }

    /// Reduces a 64-byte little-endian integer modulo `l`, as used for
    /// hash outputs (SHA-512, BLAKE2b) feeding into scalar generation.
    pub fn from_bytes_mod_order_wide(input: &[u8; 64]) -> Scalar {
        Scalar {
            bytes: reduce_mod_l(input),
        }
    }

    /// The X25519/Ed25519 "clamping" applied to a uniformly random 32-byte
    /// secret: clear the low 3 bits and bit 255, set bit 254. This fixes
    /// the scalar's cofactor component and its bit length, without
    /// reducing modulo `l` (clamped scalars are never canonical residues,
    /// only Montgomery-ladder-safe values below `8*l`).
    pub fn from_clamped_bytes(mut bytes: [u8; 32]) -> Scalar {
        bytes[0] &= 248;
        bytes[31] &= 127;
        bytes[31] |= 64;
        Scalar { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    /// Rejects non-canonical encodings: `s >= l`.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Option<Scalar> {
        if is_ge_l(&bytes) {
            None
        } else {
            Some(Scalar { bytes })
        }
    }

    pub fn negate(&self) -> Scalar {
        Scalar::ZERO.sub(self)
    }

    pub fn add(&self, other: &Scalar) -> Scalar {
        let mut wide = [0u8; 64];
        let sum = add_unreduced(&self.bytes, &other.bytes);
        wide[..33].copy_from_slice(&sum);
        Scalar::from_bytes_mod_order_wide(&wide)
    }

    pub fn sub(&self, other: &Scalar) -> Scalar {
        self.add(&other.negate_unreduced())
    }

    pub fn mul(&self, other: &Scalar) -> Scalar {
        schoolbook_mul_reduce(&self.bytes, &other.bytes)
    }

    /// `l - s` computed as an unreduced 33-byte borrow subtraction, used
    /// internally by [`Scalar::sub`] before the final wide reduction.
    fn negate_unreduced(&self) -> Scalar {
        let mut l33 = [0u8; 33];
        l33[..32].copy_from_slice(&L);
        let mut out = [0u8; 33];
        let mut borrow = 0i32;
        for i in 0..33 {
            let a = l33[i] as i32;
            let b = self.bytes.get(i).copied().unwrap_or(0) as i32;
            let mut diff = a - b - borrow;
            if diff < 0 {
                diff += 256;
                borrow = 1;
            } else {
                borrow = 0;
            }
            out[i] = diff as u8;
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&out[..32]);
        Scalar { bytes }
    }

    /// Right-shifts this scalar's byte encoding by 8 bits (division by
    /// 256), used by the `qDSA`-style verification that operates on
    /// `floor(s/256)` style derived scalars.
    pub fn shift_right_8(&self) -> Scalar {
        let mut bytes = [0u8; 32];
        for i in 0..31 {
            bytes[i] = self.bytes[i + 1];
        }
        Scalar { bytes }
    }

    /// `8*s mod l`, the "shifted-by-8" scalar policy used to clear
    /// cofactor ambiguity before a Ristretto/qDSA scalar multiplication:
    /// three doublings mod `l`.
    pub fn times_eight(&self) -> Scalar {
        let two = self.add(self);
        let four = two.add(&two);
        four.add(&four)
    }

    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Scalar::ZERO)
    }
}

fn add_unreduced(a: &[u8; 32], b: &[u8; 32]) -> [u8; 33] {
    let mut out = [0u8; 33];
    let mut carry = 0u32;
    for i in 0..32 {
        let sum = a[i] as u32 + b[i] as u32 + carry;
        out[i] = sum as u8;
        carry = sum >> 8;
    }
    out[32] = carry as u8;
    out
}

fn is_ge_l(bytes: &[u8; 32]) -> bool {
    for i in (0..32).rev() {
        if bytes[i] > L[i] {
            return true;
        }
        if bytes[i] < L[i] {
            return false;
        }
    }
    true // equal to L counts as non-canonical
}

/// Schoolbook multiply-then-reduce: `a * b mod l`, via a full 64-byte
/// product followed by [`reduce_mod_l`].
fn schoolbook_mul_reduce(a: &[u8; 32], b: &[u8; 32]) -> Scalar {
    let mut product = [0u32; 64];
    for i in 0..32 {
        for j in 0..32 {
            product[i + j] += a[i] as u32 * b[j] as u32;
        }
    }
    // Propagate byte carries through the 64-limb accumulator.
    let mut carry = 0u32;
    let mut wide = [0u8; 64];
    for i in 0..64 {
        let v = product[i] + carry;
        wide[i] = v as u8;
        carry = v >> 8;
    }
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Reduces a 512-bit little-endian integer modulo `l` by schoolbook long
/// division: walk the dividend from its most significant bit down,
/// maintaining a running remainder, and at each step double the
/// remainder, bring in the next bit, and conditionally subtract `l`.
/// This is the textbook shift-and-subtract reduction rather than
/// `ref10`'s radix-2^25.5 carry-chain `sc_reduce`: slower, but its
/// correctness follows directly from long division instead of a
/// delicate per-limb carry argument, which matters when there is no
/// compiler here to catch a transcription slip.
///
/// `input` carries secret data whenever this is reached through signing
/// (the nonce `r` and `h*a` in `s` are both reduced this way), so every
/// step below is written branch-free on `input`'s bits and on
/// `remainder`'s value: the bit extracted from `input` and the
/// greater-or-equal-`l` decision both flow through [`Choice`]-based
/// conditional selects rather than `if`.
fn reduce_mod_l(input: &[u8; 64]) -> [u8; 32] {
    let mut remainder = [0u8; 32]; // always kept < l

    for bit_pos in (0..512).rev() {
        shl1_mod_l(&mut remainder);
        let byte = input[bit_pos / 8];
        let bit = (byte >> (bit_pos % 8)) & 1;
        add_bit_mod_l(&mut remainder, bit);
    }

    remainder
}

/// `remainder = (remainder * 2) mod l`, `remainder` assumed `< l`.
fn shl1_mod_l(remainder: &mut [u8; 32]) {
    let mut carry = 0u8;
    for i in 0..32 {
        let doubled = (remainder[i] << 1) | carry;
        carry = remainder[i] >> 7;
        remainder[i] = doubled;
    }
    // carry here would be bit 256 of a `< l < 2^253` value, so it is
    // always 0; the conditional subtraction below still runs to clear
    // any value in `[l, 2l)`.
    reduce_once_ct(remainder);
}

/// `remainder = (remainder + bit) mod l`, `remainder` assumed `< l`,
/// `bit` a 0/1 value. Runs the same fixed sequence of operations
/// regardless of `bit`'s value: adding 0 is mathematically a no-op, but
/// the loop still executes so the timing carries no information about
/// which bits of the original hash output were set.
fn add_bit_mod_l(remainder: &mut [u8; 32], bit: u8) {
    let mut carry = bit as u16;
    for i in 0..32 {
        let sum = remainder[i] as u16 + carry;
        remainder[i] = sum as u8;
        carry = sum >> 8;
    }
    reduce_once_ct(remainder);
}

/// Conditionally subtracts `l` from `value` so that it ends up `< l`,
/// without branching on `value`: computes `value - l` unconditionally
/// (branch-free, via an arithmetic-shift borrow extraction) and then
/// constant-time-selects between `value` and the difference based on
/// whether the subtraction underflowed.
fn reduce_once_ct(value: &mut [u8; 32]) {
    let mut diff = [0u8; 32];
    let mut borrow = 0i32;
    for i in 0..32 {
        let d = value[i] as i32 - L[i] as i32 - borrow;
        diff[i] = (d & 0xff) as u8;
        // Arithmetic right shift sign-extends: `d < 0` makes every bit
        // of `d >> 8` a 1, so `& 1` yields exactly the borrow-out bit
        // without an `if`.
        borrow = (d >> 8) & 1;
    }
    // `borrow == 1` means `value < l` (the subtraction underflowed), so
    // `value` was already reduced and `diff` must be discarded.
    let geq_l = Choice::from((1 - borrow) as u8);
    for i in 0..32 {
        value[i] = u8::conditional_select(&value[i], &diff[i], geq_l);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_reduces_to_zero() {
        let z = Scalar::from_bytes_mod_order(&[0u8; 32]);
        assert_eq!(z, Scalar::ZERO);
    }

    #[test]
    fn one_plus_zero_is_one() {
        assert_eq!(Scalar::ONE.add(&Scalar::ZERO), Scalar::ONE);
    }

    #[test]
    fn l_reduces_to_zero() {
        let l_scalar = Scalar::from_bytes_mod_order(&L);
        assert_eq!(l_scalar, Scalar::ZERO);
    }

    #[test]
    fn add_then_sub_is_identity() {
        let a = Scalar::from_bytes_mod_order(&[7u8; 32]);
        let b = Scalar::from_bytes_mod_order(&[200u8; 32]);
        let sum = a.add(&b);
        assert_eq!(sum.sub(&b), a);
    }

    #[test]
    fn negate_twice_is_identity() {
        let a = Scalar::from_bytes_mod_order(&[42u8; 32]);
        assert_eq!(a.negate().negate(), a);
    }

    #[test]
    fn mul_by_one_is_identity() {
        let a = Scalar::from_bytes_mod_order(&[99u8; 32]);
        assert_eq!(a.mul(&Scalar::ONE), a);
    }

    #[test]
    fn clamped_bytes_have_expected_bit_pattern() {
        let s = Scalar::from_clamped_bytes([0xffu8; 32]);
        assert_eq!(s.bytes[0] & 0x07, 0);
        assert_eq!(s.bytes[31] & 0x80, 0);
        assert_eq!(s.bytes[31] & 0x40, 0x40);
    }

    #[test]
    fn from_canonical_bytes_rejects_l() {
        assert!(Scalar::from_canonical_bytes(L).is_none());
    }

    #[test]
    fn times_eight_matches_eight_additions() {
        let s = Scalar::from_bytes_mod_order(&[13u8; 32]);
        let mut eight_s = Scalar::ZERO;
        for _ in 0..8 {
            eight_s = eight_s.add(&s);
        }
        assert_eq!(s.times_eight(), eight_s);
    }
}
