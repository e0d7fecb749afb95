//! 64-bit serial backend: 5 limbs of 51 bits, `u64` operands, `u128`
//! accumulators.

pub mod field;
