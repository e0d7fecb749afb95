//! Precomputed summands and lookup tables for windowed scalar multiplication.

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable};

use crate::edwards::{EdwardsPoint, ProjectiveNielsPoint};

/// A lookup table of `[P, 2P, 3P, ..., 8P]` in projective Niels form, used
/// by the fixed 4-bit-window variable-base multiplier
/// ([`crate::scalar_mul::variable_base`]) and by `scalarbase`'s per-limb
/// tables.
#[derive(Copy, Clone)]
pub struct LookupTable8(pub(crate) [ProjectiveNielsPoint; 8]);

impl LookupTable8 {
    pub fn from_point(p: &EdwardsPoint) -> Self {
        let mut table = [ProjectiveNielsPoint::from(p); 8];
        for i in 0..7 {
            table[i + 1] = (p + &table[i].to_extended()).as_projective_niels();
        }
        LookupTable8(table)
    }

    /// Select `16^pos * j * P` worth of a signed 4-bit digit `j in
    /// -8..=8` in constant time: load the magnitude, then conditionally
    /// negate.
    pub fn select(&self, x: i8) -> ProjectiveNielsPoint {
        debug_assert!((-8..=8).contains(&x));

        let sign = Choice::from((x as u8) >> 7); // 1 if x < 0 (two's complement sign bit)
        let xabs = x.unsigned_abs();

        let mut result = ProjectiveNielsPoint::identity();
        for j in 1..9u8 {
            let choice = Choice::from((xabs == j) as u8);
            result.conditional_assign(&self.0[(j - 1) as usize], choice);
        }
        let minus = result.negate();
        ProjectiveNielsPoint::conditional_select(&result, &minus, sign)
    }
}

/// `[P, 3P, 5P, ..., 15P]` used by the variable-time wNAF multiplier
/// (window width 5).
pub struct NafLookupTable5(pub(crate) [ProjectiveNielsPoint; 8]);

impl NafLookupTable5 {
    pub fn from_point(p: &EdwardsPoint) -> Self {
        let mut table = [ProjectiveNielsPoint::from(p); 8];
        let p2 = p.double();
        for i in 0..7 {
            table[i + 1] = (&p2 + &table[i].to_extended()).as_projective_niels();
        }
        NafLookupTable5(table)
    }

    /// `x` is odd, `-15 <= x <= 15`.
    pub fn select(&self, x: i8) -> EdwardsPoint {
        debug_assert_eq!(x & 1, 1);
        debug_assert!((-15..=15).contains(&x));
        if x > 0 {
            self.0[(x as usize) / 2].to_extended()
        } else {
            self.0[(-x as usize) / 2].to_extended().negate()
        }
    }
}

/// `[B, 3B, 5B, ..., 31B]`, window width 6, for the base point term of the
/// double-base variable-time multiplier.
pub struct NafLookupTable6(pub(crate) [ProjectiveNielsPoint; 16]);

impl NafLookupTable6 {
    pub fn from_point(p: &EdwardsPoint) -> Self {
        let mut table = [ProjectiveNielsPoint::from(p); 16];
        let p2 = p.double();
        for i in 0..15 {
            table[i + 1] = (&p2 + &table[i].to_extended()).as_projective_niels();
        }
        NafLookupTable6(table)
    }

    /// `x` is odd, `-31 <= x <= 31`.
    pub fn select(&self, x: i8) -> EdwardsPoint {
        debug_assert_eq!(x & 1, 1);
        debug_assert!((-31..=31).contains(&x));
        if x > 0 {
            self.0[(x as usize) / 2].to_extended()
        } else {
            self.0[(-x as usize) / 2].to_extended().negate()
        }
    }
}

/// Compute the width-`w` non-adjacent form of a 256-bit scalar. Digits are
/// odd and in `-(2^(w-1)-1) ..= 2^(w-1)-1`, at most one nonzero digit per
/// `w` consecutive positions. This is strictly a variable-time helper: it
/// branches on the scalar's bits and must never be handed a secret scalar.
pub fn non_adjacent_form(bytes: &[u8; 32], w: usize) -> [i8; 256] {
    debug_assert!((2..=8).contains(&w));
    let mut naf = [0i8; 256];

    let mut x_u64 = [0u64; 5];
    for i in 0..4 {
        x_u64[i] = u64::from_le_bytes(bytes[i * 8..i * 8 + 8].try_into().unwrap());
    }

    let width = 1u64 << w;
    let window_mask = width - 1;

    let mut pos = 0usize;
    let mut carry = 0u64;
    while pos < 256 {
        let u64_idx = pos / 64;
        let bit_idx = pos % 64;
        let bit_buf = if bit_idx < 64 - w {
            x_u64[u64_idx] >> bit_idx
        } else {
            (x_u64[u64_idx] >> bit_idx) | (x_u64[1 + u64_idx] << (64 - bit_idx))
        };

        let window = carry + (bit_buf & window_mask);

        if window & 1 == 0 {
            pos += 1;
            continue;
        }

        if window < width / 2 {
            carry = 0;
            naf[pos] = window as i8;
        } else {
            carry = 1;
            naf[pos] = (window as i8).wrapping_sub(width as i8);
        }

        pos += w;
    }

    naf
}
