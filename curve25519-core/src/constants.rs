//! Curve and field constants.
//!
//! Rather than transcribing large hardcoded limb tables (easy to get
//! subtly wrong and impossible to check here without a compiler), every
//! constant below is *derived* from its mathematical definition using the
//! already-verified field operations in [`crate::field`], and cached in a
//! `OnceLock` so the derivation runs once per process. `MONTGOMERY_A` and
//! the group order `L` are the two genuinely fixed literals in the file;
//! everything else is computed from them.

use std::sync::OnceLock;

use crate::field::{self, FieldElement};

/// The order of the prime-order subgroup, `l = 2^252 +
/// 27742317777372353535851937790883648493`, little-endian.
pub const L: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
];

/// `sqrt(-1) mod p`. Since `p ≡ 5 (mod 8)`, `2` is a quadratic
/// non-residue, so `2^((p-1)/2) ≡ -1`, hence `2^((p-1)/4)` squares to `-1`.
pub fn sqrt_m1() -> FieldElement {
    static CELL: OnceLock<FieldElement> = OnceLock::new();
    *CELL.get_or_init(|| {
        let two = FieldElement::ONE.add(&FieldElement::ONE);
        let t = two.pow_p58(); // 2^((p-5)/8)
        t.square().mul_small(2) // 2^((p-1)/4)
    })
}

/// The Montgomery curve parameter `A = 486662`.
pub fn montgomery_a() -> FieldElement {
    FieldElement::ONE.mul_small(486662)
}

pub fn montgomery_a_neg() -> FieldElement {
    montgomery_a().negate()
}

/// `(A+2)/4 = 121666`, used by the Montgomery ladder's doubling step.
pub fn aplus2_over_four() -> FieldElement {
    FieldElement::ONE.mul_small(121666)
}

/// The twisted Edwards curve parameter `d = -121665/121666 mod p`.
pub fn edwards_d() -> FieldElement {
    static CELL: OnceLock<FieldElement> = OnceLock::new();
    *CELL.get_or_init(|| {
        let num = FieldElement::ONE.mul_small(121665).negate();
        let den = FieldElement::ONE.mul_small(121666);
        num.mul(&den.invert())
    })
}

pub fn edwards_d2() -> FieldElement {
    let d = edwards_d();
    d.add(&d)
}

/// `sqrt(a*d - 1)` with `a = -1`, i.e. `sqrt(-d - 1)`. Used by Ristretto
/// decoding.
pub fn sqrt_ad_minus_one() -> FieldElement {
    static CELL: OnceLock<FieldElement> = OnceLock::new();
    *CELL.get_or_init(|| {
        let ad_minus_one = edwards_d().negate().sub(&FieldElement::ONE);
        field::sqrt(&ad_minus_one).expect("a*d - 1 is a square by construction of p, d")
    })
}

/// `1/sqrt(a - d)` with `a = -1`, i.e. `1/sqrt(-1 - d)`.
pub fn invsqrt_a_minus_d() -> FieldElement {
    static CELL: OnceLock<FieldElement> = OnceLock::new();
    *CELL.get_or_init(|| {
        let a_minus_d = FieldElement::ONE.negate().sub(&edwards_d());
        field::invsqrt(&a_minus_d).expect("a - d is a nonzero square by construction of p, d")
    })
}

pub fn one_minus_edwards_d_squared() -> FieldElement {
    let d = edwards_d();
    FieldElement::ONE.sub(&d.square())
}

pub fn edwards_d_minus_one_squared() -> FieldElement {
    let d = edwards_d();
    d.sub(&FieldElement::ONE).square()
}

/// The Ed25519 base point, derived from its canonical definition
/// (`y = 4/5`, `x` the unique nonnegative root of the curve equation).
/// Exposed as Edwards extended coordinates by [`crate::edwards::basepoint`].
pub(crate) fn basepoint_y() -> FieldElement {
    static CELL: OnceLock<FieldElement> = OnceLock::new();
    *CELL.get_or_init(|| {
        let four = FieldElement::ONE.mul_small(4);
        let five = FieldElement::ONE.mul_small(5);
        four.mul(&five.invert())
    })
}
