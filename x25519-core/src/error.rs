use thiserror::Error;

/// Errors returned by the X25519 key-agreement API.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum X25519Error {
    #[error("diffie-hellman result was all-zero (peer sent a small-order point)")]
    NonContributory,
    #[error("diffie-hellman input was on the twist or a small-order subgroup")]
    SmallOrder,
}
