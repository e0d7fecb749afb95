// -*- mode: rust; -*-
//
// This file is part of aead25519.
// See LICENSE for licensing information.

//! Multi-recipient ChaCha20-Poly1305 AEAD: the bare `encrypt_multi`/
//! `decrypt_multi` primitive, the header-prefixed packet format built on
//! top of it, and the streaming layered format used to seal whole files.

pub mod errors;
pub mod multi;
pub mod packet;
pub mod stream;

pub use errors::AeadError;
pub use multi::{decrypt_multi, encrypt_multi};
pub use packet::{decrypt_packet, encrypt_packet, peek_head};
pub use stream::{open_stream, seal_stream};
