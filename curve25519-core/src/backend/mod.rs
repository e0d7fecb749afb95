//! Serial (non-vectorized) backends for field arithmetic.
//!
//! Two limb representations are provided, matching §4.A of the design: a
//! 5-limb, 51-bit-per-limb representation for 64-bit targets, and a
//! 10-limb, 25.5-bit-per-limb representation for 32-bit targets. Both
//! expose the same operation set through [`crate::field::FieldElement`],
//! which is a thin `cfg`-selected type alias over whichever backend fits
//! the target word size.

pub mod serial;
