// -*- mode: rust; -*-
//
// This file is part of sign25519.
// See LICENSE for licensing information.

//! Three Curve25519-family signature schemes, all built on
//! `curve25519-core`'s group layer:
//!
//! - [`sey`]: Ed25519 (RFC 8032), bit-for-bit interoperable.
//! - [`bmx`]: a Curve25519-native scheme whose signing scalar is an
//!   ordinary X25519 secret and whose public key is an ordinary X25519
//!   public key.
//! - [`sha`]: the same construction over the Ristretto255 prime-order
//!   group instead of raw Edwards points.
//!
//! `bmx` and `sha` each additionally expose a qDSA-style verification
//! path (`verify_qdsa`) that checks the signature relation using only
//! Montgomery `u`-coordinates and the ladder, as a second, independently
//! implemented way to check the same signatures -- useful on
//! constrained targets that already carry a Montgomery ladder for X25519
//! and would rather not also implement full Edwards/Ristretto point
//! decompression.

pub mod bmx;
pub mod errors;
pub mod sey;
pub mod sha;

pub use errors::SignError;
