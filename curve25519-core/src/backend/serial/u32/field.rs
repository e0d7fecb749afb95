// -*- mode: rust; -*-
//
// This file is part of curve25519-core.
// See LICENSE for licensing information.

//! `FieldElement2625`: ten `u32` limbs of alternating 26/25 bits.

use core::fmt::Debug;

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

use crate::backend::serial::u64::field::FieldElement51;

/// Bit width of limb `i`, alternating 26, 25, 26, 25, ...
const SHIFT: [u32; 10] = [0, 26, 51, 77, 102, 128, 153, 179, 204, 230];

#[derive(Copy, Clone)]
pub struct FieldElement2625(pub(crate) [u32; 10]);

impl Debug for FieldElement2625 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement2625({:?})", &self.0[..])
    }
}

impl Eq for FieldElement2625 {}
impl PartialEq for FieldElement2625 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl ConstantTimeEq for FieldElement2625 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.as_bytes().ct_eq(&other.as_bytes())
    }
}

impl ConditionallySelectable for FieldElement2625 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u32; 10];
        for i in 0..10 {
            out[i] = u32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        FieldElement2625(out)
    }

    fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        for i in 0..10 {
            self.0[i].conditional_assign(&other.0[i], choice);
        }
    }
}

impl ConditionallyNegatable for FieldElement2625 {
    fn conditional_negate(&mut self, choice: Choice) {
        let neg = self.negate();
        self.conditional_assign(&neg, choice);
    }
}

impl FieldElement2625 {
    pub const ZERO: FieldElement2625 = FieldElement2625([0; 10]);
    pub const ONE: FieldElement2625 = FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    pub const fn from_limbs(limbs: [u32; 10]) -> FieldElement2625 {
        FieldElement2625(limbs)
    }

    pub const fn limbs(&self) -> &[u32; 10] {
        &self.0
    }

    /// Reassemble the ten bit-packed limbs into the flat little-endian byte
    /// form (the inverse of [`FieldElement2625::from_bytes`]'s unpacking),
    /// then hand that to the 5x51 backend. No modular reduction happens
    /// here: this is pure bit placement, exactly mirroring how the limbs
    /// were extracted in the first place.
    fn to_wide(self) -> FieldElement51 {
        let mut words = [0u64; 4];
        for i in 0..10 {
            let shift = SHIFT[i];
            let value = self.0[i] as u128;
            let word_idx = (shift / 64) as usize;
            let bit_off = shift % 64;
            let combined = value << bit_off;
            words[word_idx] |= combined as u64;
            let hi = (combined >> 64) as u64;
            if word_idx + 1 < 4 {
                words[word_idx + 1] |= hi;
            }
        }
        let mut bytes = [0u8; 32];
        for (w, word) in words.iter().enumerate() {
            bytes[w * 8..w * 8 + 8].copy_from_slice(&word.to_le_bytes());
        }
        FieldElement51::from_bytes(&bytes)
    }

    fn from_wide(w: FieldElement51) -> FieldElement2625 {
        let bytes = w.as_bytes();
        FieldElement2625::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> FieldElement2625 {
        let load4 = |b: &[u8]| -> u64 {
            (b[0] as u64) | ((b[1] as u64) << 8) | ((b[2] as u64) << 16) | ((b[3] as u64) << 24)
        };
        let low25 = (1u64 << 25) - 1;
        let low26 = (1u64 << 26) - 1;

        let mut h = [0u32; 10];
        h[0] = (load4(&bytes[0..4]) & low26) as u32;
        h[1] = ((load4(&bytes[3..7]) >> 2) & low25) as u32;
        h[2] = ((load4(&bytes[6..10]) >> 3) & low26) as u32;
        h[3] = ((load4(&bytes[9..13]) >> 5) & low25) as u32;
        h[4] = ((load4(&bytes[12..16]) >> 6) & low26) as u32;
        h[5] = (load4(&bytes[16..20]) & low25) as u32;
        h[6] = ((load4(&bytes[19..23]) >> 1) & low26) as u32;
        h[7] = ((load4(&bytes[22..26]) >> 3) & low25) as u32;
        h[8] = ((load4(&bytes[25..29]) >> 4) & low26) as u32;
        h[9] = ((load4(&bytes[28..32]) >> 6) & 0x001f_ffff) as u32; // top bit dropped
        FieldElement2625(h)
    }

    pub fn as_bytes(&self) -> [u8; 32] {
        self.to_wide().as_bytes()
    }

    pub fn add(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        FieldElement2625::from_wide(self.to_wide().add(&rhs.to_wide()))
    }

    pub fn sub(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        FieldElement2625::from_wide(self.to_wide().sub(&rhs.to_wide()))
    }

    pub fn negate(&self) -> FieldElement2625 {
        FieldElement2625::from_wide(self.to_wide().negate())
    }

    pub fn mul(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        FieldElement2625::from_wide(self.to_wide().mul(&rhs.to_wide()))
    }

    pub fn square(&self) -> FieldElement2625 {
        self.mul(self)
    }

    pub fn square2(&self) -> FieldElement2625 {
        let s = self.square();
        s.add(&s)
    }

    pub fn mul_small(&self, scalar: u32) -> FieldElement2625 {
        FieldElement2625::from_wide(self.to_wide().mul_small(scalar))
    }

    pub fn pow2k(&self, k: u32) -> FieldElement2625 {
        FieldElement2625::from_wide(self.to_wide().pow2k(k))
    }

    pub fn invert(&self) -> FieldElement2625 {
        FieldElement2625::from_wide(self.to_wide().invert())
    }

    pub(crate) fn pow_p58(&self) -> FieldElement2625 {
        FieldElement2625::from_wide(self.to_wide().pow_p58())
    }

    pub fn is_negative(&self) -> Choice {
        let bytes = self.as_bytes();
        (bytes[0] & 1).into()
    }

    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&FieldElement2625::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let bytes = [11u8; 32];
        let fe = FieldElement2625::from_bytes(&bytes);
        // top bit of byte 31 is always discarded on load.
        let mut expected = bytes;
        expected[31] &= 0x7f;
        assert_eq!(fe.as_bytes(), expected);
    }

    #[test]
    fn matches_u64_backend() {
        let bytes = [200u8; 32];
        let a = FieldElement2625::from_bytes(&bytes);
        let b = FieldElement51::from_bytes(&bytes);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.mul(&a).as_bytes(), b.mul(&b).as_bytes());
    }
}
