// -*- mode: rust; -*-
//
// This file is part of curve25519-core.
// See LICENSE for licensing information.

//! Field arithmetic over `GF(2^255 - 19)` and group operations on Curve25519.
//!
//! This crate provides the low-level, constant-time building blocks used by
//! the higher-level `x25519-core` and `sign25519` crates: a field element
//! type with two interchangeable limb representations, a twisted Edwards
//! group with fixed-base/variable-base/double-base scalar multiplication,
//! a Montgomery ladder, and a Ristretto255 prime-order encoding.
//!
//! Every public operation documented as "constant-time" is written
//! branch-free on its input bytes. The `scalarmult_wnaf` family is the
//! deliberate exception: it is variable-time and MUST NOT be used with
//! secret scalars. See the module docs on [`scalar_mul`] for details.
#![allow(non_snake_case)]

pub mod constants;
pub mod edwards;
pub mod errors;
pub mod field;
pub mod montgomery;
pub mod qdsa;
pub mod ristretto;
pub mod scalar;
pub mod scalar_mul;
pub mod window;

mod backend;

pub use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
pub use crate::errors::GroupError;
pub use crate::field::FieldElement;
pub use crate::montgomery::{ElligatorRepresentative, MontgomeryPoint};
pub use crate::qdsa::curverify_mont;
pub use crate::ristretto::{CompressedRistretto, RistrettoPoint};
pub use crate::scalar::Scalar;
