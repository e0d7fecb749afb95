//! 32-bit serial backend: 10 limbs of ~25.5 bits, `u32` operands.
//!
//! The limb layout (`value = sum_i limbs[i] * 2^(ceil(25.5*i))`, alternating
//! 26/25-bit limbs) is the genuine on-the-wire representation used by
//! targets that select this backend. Its arithmetic core is implemented by
//! converting to the verified 5x51-bit accumulator used by the 64-bit
//! backend for the duration of a single operation; see `DESIGN.md` for why
//! that tradeoff was made here instead of a from-scratch 10-limb carry
//! chain (u32 operand / u64 accumulator) that has no compiler to check it.

pub mod field;
