//! Errors returned at the signature API boundary.

use thiserror::Error;

#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum SignError {
    #[error("signature S was not canonical (S >= l)")]
    BadScalar,
    #[error("a compressed point did not decode")]
    BadPoint,
    #[error("signature did not verify")]
    BadSignature,
}
