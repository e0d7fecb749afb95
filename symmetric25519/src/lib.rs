// -*- mode: rust; -*-
//
// This file is part of symmetric25519.
// See LICENSE for licensing information.

//! Symmetric primitives: the ChaCha20 stream cipher and HChaCha20 key
//! derivation, Poly1305, BLAKE2b/BLAKE2s (with parameter blocks and XOF
//! expansion), SHA-256/SHA-512, and a hash-generic HMAC.
//!
//! This crate has no dependency on the group layer in `curve25519-core`;
//! `kdf25519`, `aead25519` and `sign25519` build on top of it.

pub mod blake2b;
pub mod blake2s;
pub mod chacha20;
pub mod hmac;
pub mod poly1305;
pub mod sha2;

pub use chacha20::Chakey;
