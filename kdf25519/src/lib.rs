// -*- mode: rust; -*-
//
// This file is part of kdf25519.
// See LICENSE for licensing information.

//! Key derivation: the Noise-protocol `mix_hash`/`mix_key` triad, a
//! generic HKDF, scrypt-BLAKE2b for password-based key derivation, and
//! the process-wide CSPRNG.

pub mod csprng;
pub mod hkdf;
pub mod noise;
pub mod scrypt;

pub use csprng::randombytes_buf;
